//! Error types for regionpaint-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] regionpaint_core::Error),

    /// No region with this key exists in the current region map
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// String is not a region key
    #[error("invalid region key: {0:?}")]
    InvalidKey(String),

    /// Raster cannot be labeled (zero-sized or inconsistent buffer)
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
