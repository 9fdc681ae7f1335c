//! Signature sniffing for uploaded images
//!
//! PNG, JPEG and BMP have dedicated readers; anything else that carries a
//! recognizable signature is handed to the generic decoder.

use crate::{IoError, IoResult};
use std::io::Read;
use std::path::Path;

/// Container format of an image stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    #[default]
    Unknown,
    Bmp,
    Jpeg,
    Png,
    Gif,
    Tiff,
    WebP,
    Pnm,
}

impl ImageFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Bmp => "bmp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Tiff => "tif",
            Self::WebP => "webp",
            Self::Pnm => "pnm",
        }
    }

    /// Whether a dedicated reader exists, as opposed to the generic fallback.
    pub fn has_native_reader(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Bmp)
    }
}

/// Leading-byte signatures, checked in order.
const SIGNATURES: &[(&[u8], ImageFormat)] = &[
    (b"\x89PNG\r\n\x1a\n", ImageFormat::Png),
    (b"\xff\xd8\xff", ImageFormat::Jpeg),
    (b"BM", ImageFormat::Bmp),
    (b"GIF87a", ImageFormat::Gif),
    (b"GIF89a", ImageFormat::Gif),
    (b"II*\x00", ImageFormat::Tiff),
    (b"MM\x00*", ImageFormat::Tiff),
    (b"P4", ImageFormat::Pnm),
    (b"P5", ImageFormat::Pnm),
    (b"P6", ImageFormat::Pnm),
];

/// Bytes needed to tell every supported signature apart.
const HEADER_LEN: usize = 12;

fn is_webp(data: &[u8]) -> bool {
    data.len() >= HEADER_LEN && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// Sniff the format of the file at `path` from its first bytes.
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let file = std::fs::File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Sniff the format of an in-memory stream.
///
/// # Errors
///
/// [`IoError::InvalidData`] for streams shorter than two bytes,
/// [`IoError::UnsupportedFormat`] when no signature matches.
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(format!(
            "{} byte(s) is too short for an image header",
            data.len()
        )));
    }
    if is_webp(data) {
        return Ok(ImageFormat::WebP);
    }
    SIGNATURES
        .iter()
        .find(|(sig, _)| data.starts_with(sig))
        .map(|&(_, format)| format)
        .ok_or_else(|| IoError::UnsupportedFormat("no known image signature".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_signatures() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(detect_format_from_bytes(png).unwrap(), ImageFormat::Png);
        let jpeg = b"\xff\xd8\xff\xe0\0\x10JFIF\0\x01";
        assert_eq!(detect_format_from_bytes(jpeg).unwrap(), ImageFormat::Jpeg);
        assert_eq!(detect_format_from_bytes(b"BM\x3a\0\0\0").unwrap(), ImageFormat::Bmp);
        assert!(ImageFormat::Bmp.has_native_reader());
    }

    #[test]
    fn test_fallback_signatures() {
        for (data, format) in [
            (&b"GIF89a\x01\0"[..], ImageFormat::Gif),
            (&b"RIFF\x24\0\0\0WEBPVP8 "[..], ImageFormat::WebP),
            (&b"MM\0*\0\0\0\x08"[..], ImageFormat::Tiff),
            (&b"P5\n4 4\n255\n"[..], ImageFormat::Pnm),
        ] {
            assert_eq!(detect_format_from_bytes(data).unwrap(), format);
            assert!(!format.has_native_reader());
        }
    }

    #[test]
    fn test_unrecognized() {
        assert!(matches!(
            detect_format_from_bytes(b"hello, world"),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format_from_bytes(b"B"),
            Err(IoError::InvalidData(_))
        ));
    }
}
