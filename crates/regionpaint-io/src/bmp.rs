//! BMP image format support
//!
//! Reads uncompressed Windows Bitmap (BMP) files. Palette images
//! (1, 4, 8 bpp) are resolved through their color table, so every
//! result is packed RGBA.
//!
//! Header fields are untrusted: the pixel count is capped at
//! [`MAX_PIXELS`] and pixel data is read before the raster is allocated,
//! so a short file cannot request more memory than it carries.

use crate::{IoError, IoResult};
use regionpaint_core::{Raster, color};
use std::io::{self, Read};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: u64 = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Largest accepted `width * height`.
pub const MAX_PIXELS: u64 = 1 << 26;

fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn skip<R: Read>(reader: &mut R, count: u64) -> IoResult<()> {
    let skipped = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if skipped < count {
        return Err(IoError::DecodeError(format!(
            "BMP ends {} bytes into a {} byte gap",
            skipped, count
        )));
    }
    Ok(())
}

/// Read a BMP image
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Raster> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE as usize];
    reader.read_exact(&mut file_header)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }
    let pixel_offset = u64::from(le_u32(&file_header[10..14]));

    let mut info_header = [0u8; BMP_INFO_HEADER_SIZE as usize];
    reader.read_exact(&mut info_header)?;

    let header_size = le_u32(&info_header[0..4]);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_u32(&info_header[4..8]) as i32;
    let height = le_u32(&info_header[8..12]) as i32;
    let planes = le_u16(&info_header[12..14]);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }
    let bits_per_pixel = le_u16(&info_header[14..16]);
    let compression = le_u32(&info_header[16..20]);
    let colors_used = le_u32(&info_header[32..36]) as usize;

    // Only uncompressed (BI_RGB) and bitfields with the default masks
    if compression != 0 && compression != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }
    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXELS {
        return Err(IoError::DecodeError(format!(
            "BMP size {}x{} exceeds the {} pixel limit",
            width, height, MAX_PIXELS
        )));
    }

    skip(&mut reader, u64::from(header_size - BMP_INFO_HEADER_SIZE))?;

    let palette: Vec<u32> = if bits_per_pixel <= 8 {
        let max_colors = 1usize << bits_per_pixel;
        let num_colors = if colors_used == 0 {
            max_colors
        } else {
            colors_used.min(max_colors)
        };
        let mut table = vec![0u8; num_colors * 4];
        reader.read_exact(&mut table)?;
        table
            .chunks_exact(4)
            .map(|bgr| color::compose_rgb(bgr[2], bgr[1], bgr[0]))
            .collect()
    } else {
        Vec::new()
    };

    let current_pos = BMP_FILE_HEADER_SIZE + u64::from(header_size) + palette.len() as u64 * 4;
    if pixel_offset > current_pos {
        skip(&mut reader, pixel_offset - current_pos)?;
    }

    // BMP rows are 4-byte aligned
    let row_stride = (width as usize * bits_per_pixel as usize).div_ceil(32) * 4;
    let data_len = (row_stride as u64) * u64::from(height);
    let mut data = Vec::new();
    reader.by_ref().take(data_len).read_to_end(&mut data)?;
    if (data.len() as u64) < data_len {
        return Err(IoError::DecodeError(format!(
            "BMP pixel data truncated: {} of {} bytes",
            data.len(),
            data_len
        )));
    }

    let mut raster = Raster::new(width, height)?.to_mut();
    let lookup = |index: u8| -> IoResult<u32> {
        palette.get(index as usize).copied().ok_or_else(|| {
            IoError::InvalidData(format!("BMP palette index {} out of range", index))
        })
    };

    for (row, line) in (0..height).zip(data.chunks_exact(row_stride)) {
        let y = if top_down { row } else { height - 1 - row };

        for x in 0..width {
            let xi = x as usize;
            let pixel = match bits_per_pixel {
                1 => lookup((line[xi / 8] >> (7 - (xi % 8))) & 1)?,
                4 => {
                    let byte = line[xi / 2];
                    lookup(if xi % 2 == 0 { byte >> 4 } else { byte & 0xF })?
                }
                8 => lookup(line[xi])?,
                24 => {
                    let idx = xi * 3;
                    color::compose_rgb(line[idx + 2], line[idx + 1], line[idx])
                }
                _ => {
                    let idx = xi * 4;
                    color::compose_rgba(line[idx + 2], line[idx + 1], line[idx], line[idx + 3])
                }
            };
            raster.set_pixel_unchecked(x, y, pixel);
        }
    }

    Ok(raster.into())
}
