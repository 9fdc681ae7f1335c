//! Decoding through the `image` crate
//!
//! Used for every format without a dedicated reader in this crate
//! (GIF, TIFF, WebP, PNM, ...). The first frame is converted to RGBA8.

use crate::{IoError, IoResult};
use regionpaint_core::Raster;

/// Decode any format the `image` crate recognizes.
pub fn read_any(data: &[u8]) -> IoResult<Raster> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| IoError::DecodeError(format!("image decode error: {}", e)))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Raster::from_rgba_bytes(width, height, rgba.as_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_any_rejects_garbage() {
        assert!(matches!(
            read_any(b"definitely not an image"),
            Err(IoError::DecodeError(_))
        ));
    }
}
