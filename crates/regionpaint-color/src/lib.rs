//! regionpaint-color - Binarization for region painting
//!
//! This crate turns arbitrary RGBA rasters into pure black-and-white
//! line art:
//!
//! - **Thresholding** ([`threshold`]): fixed luminance cut and Otsu's method,
//!   behind the [`ThresholdStrategy`] trait
//! - **Analysis** ([`analysis`]): binary checks and color counting

pub mod analysis;
pub mod error;
pub mod threshold;

// Re-export core types
pub use regionpaint_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export threshold types and functions
pub use threshold::{
    // Types
    DEFAULT_THRESHOLD,
    ThresholdMethod,
    ThresholdStrategy,
    // Functions
    binarize,
    compute_otsu_threshold,
    luminance_histogram,
    threshold_otsu,
    threshold_to_binary,
};

// Re-export analysis functions
pub use analysis::{count_matching, is_binary};
