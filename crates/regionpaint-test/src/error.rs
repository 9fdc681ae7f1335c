//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Fixture rows are empty or ragged
    #[error("invalid fixture: {0}")]
    Fixture(String),

    /// Failed to write a raster
    #[error("failed to write raster '{path}': {message}")]
    RasterWrite { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
