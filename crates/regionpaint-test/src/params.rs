//! Check bookkeeping for `*_reg` tests
//!
//! A [`RegParams`] numbers every check, keeps going after a mismatch and
//! reports all of them at the end, so one run shows the whole picture.

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use regionpaint_core::Raster;
use regionpaint_io::ImageFormat;
use std::fs;

/// Whether a run only checks, or also dumps rasters for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    #[default]
    Compare,
    /// Rasters passed to [`RegParams::write_raster`] land in `tests/regout`
    Display,
}

impl RegTestMode {
    /// `REGTEST_MODE=display` selects [`Display`](Self::Display); anything
    /// else, or no variable, means compare.
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE") {
            Ok(v) if v.eq_ignore_ascii_case("display") => Self::Display,
            _ => Self::Compare,
        }
    }
}

pub struct RegParams {
    name: String,
    index: usize,
    mode: RegTestMode,
    failures: Vec<String>,
}

impl RegParams {
    pub fn new(name: &str) -> Self {
        let mode = RegTestMode::from_env();
        if mode == RegTestMode::Display {
            let _ = fs::create_dir_all(regout_dir());
        }
        eprintln!("\n=== {}_reg ({:?}) ===", name, mode);

        Self {
            name: name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of checks made so far, raster writes included.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> RegTestMode {
        self.mode
    }

    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn next(&mut self) -> usize {
        self.index += 1;
        self.index
    }

    fn record(&mut self, ok: bool, what: impl FnOnce() -> String) -> bool {
        if !ok {
            let msg = format!("{}_reg check #{}: {}", self.name, self.index, what());
            eprintln!("{}", msg);
            self.failures.push(msg);
        }
        ok
    }

    /// Passes when `actual` is within `delta` of `expected`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.next();
        let diff = (expected - actual).abs();
        self.record(diff <= delta, || {
            format!(
                "expected {}, got {} (off by {}, allowed {})",
                expected, actual, diff, delta
            )
        })
    }

    /// Passes when both rasters have the same size and identical pixels,
    /// alpha included. Reports the first differing pixel.
    pub fn compare_raster(&mut self, expected: &Raster, actual: &Raster) -> bool {
        self.next();
        if !expected.sizes_equal(actual) {
            return self.record(false, || {
                format!(
                    "raster size {}x{}, expected {}x{}",
                    actual.width(),
                    actual.height(),
                    expected.width(),
                    expected.height()
                )
            });
        }
        let width = expected.width() as usize;
        let first_diff = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b);
        self.record(first_diff.is_none(), || {
            let i = first_diff.unwrap_or_default();
            format!(
                "rasters differ at ({}, {}): {:08x} vs {:08x}",
                i % width,
                i / width,
                expected.data()[i],
                actual.data()[i]
            )
        })
    }

    pub fn compare_strings(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.next();
        self.record(expected == actual, || {
            format!(
                "expected {:?}, got {:?}",
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(actual)
            )
        })
    }

    /// Dump `raster` as `tests/regout/<name>.<index>.png` in display mode.
    ///
    /// Counts as a check either way so file numbering is stable; returns
    /// `None` in compare mode.
    pub fn write_raster(&mut self, raster: &Raster) -> TestResult<Option<String>> {
        let index = self.next();
        if !self.display() {
            return Ok(None);
        }

        let format = ImageFormat::Png;
        let path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.name,
            index,
            format.extension()
        );
        regionpaint_io::write_image(raster, &path, format).map_err(|e| TestError::RasterWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        eprintln!("  wrote {}", path);
        Ok(Some(path))
    }

    /// Print the summary; `true` when no check failed.
    pub fn cleanup(self) -> bool {
        let ok = self.failures.is_empty();
        eprintln!(
            "=== {}_reg: {} of {} checks failed ===\n",
            self.name,
            self.failures.len(),
            self.index
        );
        for failure in &self.failures {
            eprintln!("  {}", failure);
        }
        ok
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
