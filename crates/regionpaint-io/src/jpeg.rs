//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale, RGB and
//! CMYK scans are widened to opaque packed RGBA.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use regionpaint_core::{Raster, color};
use std::io::Read;

/// Read a JPEG image from a reader.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let mut raster = Raster::new(width, height)?.to_mut();

    let samples = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::L16 => 2,
        PixelFormat::RGB24 => 3,
        PixelFormat::CMYK32 => 4,
    };
    let expected = width as usize * height as usize * samples;
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG scan too short: {} < {}",
            data.len(),
            expected
        )));
    }

    for (i, px) in data.chunks_exact(samples).take(width as usize * height as usize).enumerate() {
        let pixel = match info.pixel_format {
            PixelFormat::L8 => color::compose_rgb(px[0], px[0], px[0]),
            // big-endian samples; keep the high byte
            PixelFormat::L16 => color::compose_rgb(px[0], px[0], px[0]),
            PixelFormat::RGB24 => color::compose_rgb(px[0], px[1], px[2]),
            PixelFormat::CMYK32 => {
                let k = px[3] as u32;
                let channel = |c: u8| ((255 - c as u32) * (255 - k) / 255) as u8;
                color::compose_rgb(channel(px[0]), channel(px[1]), channel(px[2]))
            }
        };
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        raster.set_pixel_unchecked(x, y, pixel);
    }

    Ok(raster.into())
}
