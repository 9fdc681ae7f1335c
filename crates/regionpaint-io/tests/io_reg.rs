//! Image I/O regression test
//!
//! Writes rasters to disk, reads them back through format detection, and
//! checks decode failures on damaged files.

use regionpaint_io::{
    ImageFormat, IoError, detect_format, read_image, read_image_mem, write_image, write_png_mem,
};
use regionpaint_test::{RegParams, raster_from_rows, regout_dir};
use std::fs;

/// 24-bit BMP headers declaring `width`x`height` with no pixel data.
fn bmp_header_only(width: i32, height: i32) -> Vec<u8> {
    let mut out = Vec::with_capacity(54);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&[0; 24]);
    out
}

#[test]
fn io_reg() {
    let mut rp = RegParams::new("io");
    let dir = format!("{}/io_reg", regout_dir());
    fs::create_dir_all(&dir).unwrap();

    let art = raster_from_rows(&["..#..", ".#r#.", "#ggg#"]).unwrap();

    // --- PNG file roundtrip ---
    let path = format!("{}/art.png", dir);
    write_image(&art, &path, ImageFormat::Png).unwrap();
    rp.compare_values(
        1.0,
        (detect_format(&path).unwrap() == ImageFormat::Png) as u8 as f64,
        0.0,
    );
    let back = read_image(&path).unwrap();
    rp.compare_raster(&art, &back);

    // --- transparency survives ---
    let mut clear = art.to_mut();
    clear.set_rgba(0, 0, 255, 255, 255, 0).unwrap();
    let clear = clear.into();
    let back = read_image_mem(&write_png_mem(&clear).unwrap()).unwrap();
    rp.compare_raster(&clear, &back);
    rp.compare_values(0.0, back.get_rgba(0, 0).unwrap().3 as f64, 0.0);

    // --- only PNG can be written ---
    let err = write_image(&art, format!("{}/art.bmp", dir), ImageFormat::Bmp);
    rp.compare_values(
        1.0,
        matches!(err, Err(IoError::UnsupportedFormat(_))) as u8 as f64,
        0.0,
    );

    // --- damaged files are decode failures ---
    let bytes = write_png_mem(&art).unwrap();
    for cut in [9, 20, bytes.len() / 2] {
        let err = read_image_mem(&bytes[..cut]).unwrap_err();
        eprintln!("cut at {}: {}", cut, err);
        rp.compare_values(1.0, err.is_decode_failure() as u8 as f64, 0.0);
        rp.compare_values(1.0, matches!(err, IoError::DecodeError(_)) as u8 as f64, 0.0);
    }

    // --- BMP headers cannot demand memory the file does not hold ---
    for (width, height) in [(1_000_000_000, 1_000_000_000), (8000, -8000), (3, 2)] {
        let header = bmp_header_only(width, height);
        rp.compare_values(54.0, header.len() as f64, 0.0);
        let err = read_image_mem(&header).unwrap_err();
        eprintln!("{}x{} header: {}", width, height, err);
        rp.compare_values(1.0, matches!(err, IoError::DecodeError(_)) as u8 as f64, 0.0);
    }

    // --- missing file is an I/O error ---
    let err = read_image(format!("{}/missing.png", dir)).unwrap_err();
    rp.compare_values(1.0, matches!(err, IoError::Io(_)) as u8 as f64, 0.0);

    let _ = fs::remove_dir_all(&dir);
    assert!(rp.cleanup());
}
