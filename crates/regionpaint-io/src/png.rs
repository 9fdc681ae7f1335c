//! PNG image format support
//!
//! Every PNG flavor (palette, gray, 16-bit) is normalized to 8-bit
//! channels on read and widened to packed RGBA. Writes are always
//! 8-bit RGBA so that alpha survives a load/export cycle.

use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use regionpaint_core::{Raster, color};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            output_info.bit_depth
        )));
    }

    let width = output_info.width;
    let height = output_info.height;
    let samples = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG output color type: {:?}",
                other
            )));
        }
    };

    let mut raster = Raster::new(width, height)?.to_mut();
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        for x in 0..width {
            let idx = row_start + x as usize * samples;
            let pixel = match samples {
                1 => {
                    let g = data[idx];
                    color::compose_rgb(g, g, g)
                }
                2 => {
                    let g = data[idx];
                    color::compose_rgba(g, g, g, data[idx + 1])
                }
                3 => color::compose_rgb(data[idx], data[idx + 1], data[idx + 2]),
                _ => color::compose_rgba(data[idx], data[idx + 1], data[idx + 2], data[idx + 3]),
            };
            raster.set_pixel_unchecked(x, y, pixel);
        }
    }

    Ok(raster.into())
}

/// Write a raster as an 8-bit RGBA PNG
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(&raster.to_rgba_bytes())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
