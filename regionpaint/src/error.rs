//! Error type of the painting session

use thiserror::Error;

/// Errors surfaced by [`crate::Session`]
///
/// Every error is local: the session keeps its previous painting and
/// region state when an operation fails.
#[derive(Debug, Error)]
pub enum Error {
    /// Core library error
    #[error(transparent)]
    Core(#[from] regionpaint_core::Error),

    /// Image decoding or encoding failed
    #[error(transparent)]
    Io(#[from] regionpaint_io::IoError),

    /// Binarization failed
    #[error(transparent)]
    Color(#[from] regionpaint_color::ColorError),

    /// Labeling or recoloring failed
    #[error(transparent)]
    Region(#[from] regionpaint_region::RegionError),

    /// The operation needs a loaded image
    #[error("no image loaded")]
    NoImage,
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;
