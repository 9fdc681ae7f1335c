//! Error types for regionpaint-core
//!
//! Provides a unified error type for raster construction, pixel access
//! and color parsing. Each variant carries enough context for diagnostics
//! without exposing internal layout details.

use thiserror::Error;

/// regionpaint-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Coordinate outside the raster
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} raster")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Raw buffer does not match the declared dimensions
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    /// Raster dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Color string could not be parsed
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
