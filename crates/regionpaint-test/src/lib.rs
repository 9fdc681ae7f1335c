//! regionpaint-test - Regression test framework for regionpaint
//!
//! Provides [`RegParams`], which collects every failed check of one test
//! and reports them together, plus ASCII-art raster fixtures.
//!
//! # Usage
//!
//! ```ignore
//! use regionpaint_test::{RegParams, raster_from_rows};
//!
//! let raster = raster_from_rows(&["...", ".#.", "..."]).unwrap();
//! let mut rp = RegParams::new("label");
//! rp.compare_values(1.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) or "display"; display mode also
//!   writes rasters to `tests/regout` as PNG.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use regionpaint_core::{Color, Raster};

/// Mid-gray used by the `'g'` fixture cell
pub const FIXTURE_GRAY: Color = Color::new(128, 128, 128);

/// Pure red used by the `'r'` fixture cell
pub const FIXTURE_RED: Color = Color::new(255, 0, 0);

/// Build an opaque raster from ASCII art, one string per row.
///
/// | Cell | Color |
/// |------|-------|
/// | `.`  | white |
/// | `#`  | black |
/// | `g`  | gray 128 |
/// | `r`  | red |
pub fn raster_from_rows(rows: &[&str]) -> TestResult<Raster> {
    let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    if width == 0 {
        return Err(TestError::Fixture("no pixels".to_string()));
    }

    let mut raster = Raster::new(width as u32, rows.len() as u32)
        .map_err(|e| TestError::Fixture(e.to_string()))?
        .to_mut();
    for (y, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(TestError::Fixture(format!(
                "row {} has {} cells, expected {}",
                y,
                row.chars().count(),
                width
            )));
        }
        for (x, cell) in row.chars().enumerate() {
            let color = match cell {
                '.' => Color::WHITE,
                '#' => Color::BLACK,
                'g' => FIXTURE_GRAY,
                'r' => FIXTURE_RED,
                other => {
                    return Err(TestError::Fixture(format!(
                        "unknown cell {:?} at ({}, {})",
                        other, x, y
                    )));
                }
            };
            raster.set_pixel_unchecked(x as u32, y as u32, color.to_pixel());
        }
    }
    Ok(raster.into())
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // regionpaint-test is at crates/regionpaint-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
