//! Errors raised while reading or writing images
//!
//! Decoder and encoder failures from `png`, `jpeg-decoder` and `image` are
//! folded into string-carrying variants here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Recognized container that this crate cannot read or write
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Header or payload that violates the container layout
    #[error("malformed image: {0}")]
    InvalidData(String),

    #[error("decoding failed: {0}")]
    DecodeError(String),

    #[error("encoding failed: {0}")]
    EncodeError(String),

    /// Decoded dimensions rejected by the raster constructor
    #[error(transparent)]
    Core(#[from] regionpaint_core::Error),
}

impl IoError {
    /// True when the input bytes could not be turned into a raster, false
    /// for filesystem and encoder failures.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            IoError::UnsupportedFormat(_)
                | IoError::InvalidData(_)
                | IoError::DecodeError(_)
                | IoError::Core(_)
        )
    }
}

pub type IoResult<T> = Result<T, IoError>;
