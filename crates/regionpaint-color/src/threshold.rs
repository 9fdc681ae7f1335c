//! Binary thresholding
//!
//! Converts an RGBA raster to pure black and white by comparing each
//! pixel's luminance `0.299 R + 0.587 G + 0.114 B` with a cut value.
//! RGB channels become 0 or 255; alpha is copied unchanged and the input
//! raster is never modified.
//!
//! Two strategies are provided:
//! - a fixed threshold ([`DEFAULT_THRESHOLD`] = 128)
//! - Otsu's method, which picks the split of the luminance histogram that
//!   maximizes between-class variance

use crate::{ColorError, ColorResult};
use regionpaint_core::{Raster, color};
use std::fmt;
use std::str::FromStr;

/// Default fixed luminance threshold
pub const DEFAULT_THRESHOLD: u8 = 128;

/// A way of choosing the luminance cut for a raster.
///
/// Pixels with luminance `>= cut` become white, all others black.
pub trait ThresholdStrategy {
    /// Compute the cut for `raster`.
    fn cut(&self, raster: &Raster) -> ColorResult<f64>;
}

/// Built-in threshold strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMethod {
    /// Fixed luminance threshold
    Fixed(u8),
    /// Otsu's automatic threshold
    Otsu,
}

impl Default for ThresholdMethod {
    fn default() -> Self {
        ThresholdMethod::Fixed(DEFAULT_THRESHOLD)
    }
}

impl ThresholdStrategy for ThresholdMethod {
    fn cut(&self, raster: &Raster) -> ColorResult<f64> {
        match *self {
            ThresholdMethod::Fixed(t) => Ok(t as f64),
            // Otsu's t is the last level of the dark class. Rounded
            // luminance <= t must stay black, hence the half-level offset.
            ThresholdMethod::Otsu => Ok(compute_otsu_threshold(raster) as f64 + 0.5),
        }
    }
}

impl fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMethod::Fixed(t) => write!(f, "{}", t),
            ThresholdMethod::Otsu => write!(f, "otsu"),
        }
    }
}

impl FromStr for ThresholdMethod {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("otsu") {
            return Ok(ThresholdMethod::Otsu);
        }
        s.parse::<u8>().map(ThresholdMethod::Fixed).map_err(|_| {
            ColorError::InvalidParameters(format!(
                "threshold must be 0-255 or \"otsu\", got {:?}",
                s
            ))
        })
    }
}

/// Luminance of a packed pixel.
#[inline]
fn pixel_luminance(pixel: u32) -> f64 {
    let (r, g, b) = color::extract_rgb(pixel);
    color::luminance(r, g, b)
}

/// Build a 256-bin histogram of rounded luminance values.
pub fn luminance_histogram(raster: &Raster) -> [u32; 256] {
    let mut histogram = [0u32; 256];
    for &pixel in raster.data() {
        let level = (pixel_luminance(pixel).round() as usize).min(255);
        histogram[level] += 1;
    }
    histogram
}

/// Compute Otsu's threshold for a raster
///
/// Walks every candidate split `t` in increasing order, accumulating the
/// weight and mean of the dark class (levels `0..=t`) and the bright class
/// (levels above `t`), and returns the `t` with the largest between-class
/// variance `wB * wF * (mB - mF)^2`. Ties keep the lowest `t`. A raster
/// with a single luminance level yields 0.
pub fn compute_otsu_threshold(raster: &Raster) -> u8 {
    otsu_from_histogram(&luminance_histogram(raster))
}

fn otsu_from_histogram(histogram: &[u32; 256]) -> u8 {
    let total: u64 = histogram.iter().map(|&n| n as u64).sum();
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum();

    let mut sum_b = 0.0f64;
    let mut w_b = 0u64;
    let mut max_variance = 0.0f64;
    let mut threshold = 0u8;

    for (i, &count) in histogram.iter().enumerate() {
        w_b += count as u64;
        if w_b == 0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0 {
            break;
        }

        sum_b += i as f64 * count as f64;
        let m_b = sum_b / w_b as f64;
        let m_f = (sum - sum_b) / w_f as f64;

        let between = w_b as f64 * w_f as f64 * (m_b - m_f) * (m_b - m_f);
        if between > max_variance {
            max_variance = between;
            threshold = i as u8;
        }
    }

    threshold
}

/// Binarize at an arbitrary luminance cut.
fn binarize_at(raster: &Raster, cut: f64) -> Raster {
    let mut out = raster.to_mut();
    for pixel in out.data_mut() {
        let level = if pixel_luminance(*pixel) >= cut { 255 } else { 0 };
        *pixel = color::compose_rgba(level, level, level, color::alpha(*pixel));
    }
    out.into()
}

/// Convert a raster to black and white using a fixed threshold
///
/// Pixels with luminance >= threshold become white, others black.
pub fn threshold_to_binary(raster: &Raster, threshold: u8) -> ColorResult<Raster> {
    binarize(raster, &ThresholdMethod::Fixed(threshold))
}

/// Convert a raster to black and white using Otsu's method
pub fn threshold_otsu(raster: &Raster) -> ColorResult<Raster> {
    binarize(raster, &ThresholdMethod::Otsu)
}

/// Convert a raster to black and white with any threshold strategy.
pub fn binarize<S: ThresholdStrategy + ?Sized>(raster: &Raster, strategy: &S) -> ColorResult<Raster> {
    let cut = strategy.cut(raster)?;
    if cut.is_nan() {
        return Err(ColorError::InvalidParameters(
            "threshold cut is NaN".to_string(),
        ));
    }
    log::debug!(
        "binarizing {}x{} raster at luminance {:.1}",
        raster.width(),
        raster.height(),
        cut
    );
    Ok(binarize_at(raster, cut))
}
