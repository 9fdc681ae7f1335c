//! regionpaint-io - Image decoding and export
//!
//! Any supported input is decoded to a packed RGBA [`Raster`]:
//!
//! | Format | Reader | Feature |
//! |--------|--------|---------|
//! | PNG    | [`png::read_png`] (`png` crate) | `png-format` |
//! | JPEG   | [`jpeg::read_jpeg`] (`jpeg-decoder` crate) | `jpeg` |
//! | BMP    | [`bmp::read_bmp`] | `bmp` |
//! | others | [`fallback::read_any`] (`image` crate) | `fallback` |
//!
//! Output is always lossless PNG.

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
#[cfg(feature = "fallback")]
pub mod fallback;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use regionpaint_core::Raster;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor};
use std::path::Path;

/// Read an image from a file path.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let data = fs::read(path.as_ref())?;
    log::debug!(
        "read {} bytes from {}",
        data.len(),
        path.as_ref().display()
    );
    read_image_mem(&data)
}

/// Decode an image held in memory.
///
/// Every failure on this path is reported as [`IoError::DecodeError`]:
/// empty or unrecognized input, truncated streams, malformed headers and
/// rejected dimensions alike.
pub fn read_image_mem(data: &[u8]) -> IoResult<Raster> {
    let format = match detect_format_from_bytes(data) {
        Ok(format) => format,
        Err(IoError::UnsupportedFormat(_)) => ImageFormat::Unknown,
        Err(e) => return Err(as_decode_error(ImageFormat::Unknown, e)),
    };

    let raster = read_with_format(data, format).map_err(|e| as_decode_error(format, e))?;
    log::debug!(
        "decoded {:?} image {}x{}",
        format,
        raster.width(),
        raster.height()
    );
    Ok(raster)
}

fn as_decode_error(format: ImageFormat, err: IoError) -> IoError {
    match err {
        IoError::DecodeError(_) => err,
        IoError::Io(e) => IoError::DecodeError(format!("truncated {:?} data: {}", format, e)),
        other => IoError::DecodeError(format!("{:?} data: {}", format, other)),
    }
}

fn read_with_format(data: &[u8], format: ImageFormat) -> IoResult<Raster> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(Cursor::new(data)),
        #[cfg(feature = "fallback")]
        _ => fallback::read_any(data),
        #[cfg(not(feature = "fallback"))]
        other => Err(IoError::UnsupportedFormat(format!(
            "no reader enabled for {:?}",
            other
        ))),
    }
}

/// Encode a raster as PNG into a byte vector.
#[cfg(feature = "png-format")]
pub fn write_png_mem(raster: &Raster) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    png::write_png(raster, &mut buffer)?;
    Ok(buffer)
}

/// Write a raster to a file path.
///
/// Only [`ImageFormat::Png`] is supported for output.
pub fn write_image<P: AsRef<Path>>(raster: &Raster, path: P, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => {
            let file = File::create(path.as_ref())?;
            png::write_png(raster, BufWriter::new(file))
        }
        other => Err(IoError::UnsupportedFormat(format!(
            "cannot write {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionpaint_core::Color;

    #[test]
    fn test_png_mem_roundtrip() {
        let raster = Raster::new_filled(7, 3, Color::new(10, 20, 30)).unwrap();
        let bytes = write_png_mem(&raster).unwrap();
        assert_eq!(detect_format_from_bytes(&bytes).unwrap(), ImageFormat::Png);
        let decoded = read_image_mem(&bytes).unwrap();
        assert!(decoded.equals(&raster));
    }

    #[test]
    fn test_truncated_png_is_decode_error() {
        let raster = Raster::new_filled(16, 16, Color::WHITE).unwrap();
        let mut bytes = write_png_mem(&raster).unwrap();
        bytes.truncate(bytes.len() / 2);
        let err = read_image_mem(&bytes).unwrap_err();
        assert!(err.is_decode_failure(), "{err}");
    }

    #[test]
    fn test_garbage_is_decode_failure() {
        let err = read_image_mem(b"hello, this is not an image").unwrap_err();
        assert!(err.is_decode_failure(), "{err}");
    }

    #[test]
    fn test_decode_path_errors_are_decode_errors() {
        let bytes = write_png_mem(&Raster::new_filled(4, 4, Color::WHITE).unwrap()).unwrap();
        for data in [&[][..], &b"B"[..], &bytes[..bytes.len() / 2]] {
            assert!(
                matches!(read_image_mem(data), Err(IoError::DecodeError(_))),
                "{} bytes",
                data.len()
            );
        }
    }
}
