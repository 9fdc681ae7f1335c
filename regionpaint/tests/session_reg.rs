//! Session regression test
//!
//! Full pipeline from encoded image bytes: decode, binarize, label,
//! paint through clicks and pickers, and export.

use regionpaint::io::{read_image_mem, write_png_mem};
use regionpaint::region::LabelOptions;
use regionpaint::threshold::ThresholdMethod;
use regionpaint::{Color, Error, LoadStatus, Raster, RegionKey, Session, SessionOptions};
use regionpaint_test::{RegParams, raster_from_rows};

fn key(s: &str) -> RegionKey {
    s.parse().unwrap()
}

fn png(rows: &[&str]) -> Vec<u8> {
    write_png_mem(&raster_from_rows(rows).unwrap()).unwrap()
}

#[test]
fn session_reg() {
    let mut rp = RegParams::new("session");
    let red: Color = "#ff0000".parse().unwrap();
    let green: Color = "lime".parse().unwrap();

    // gray strokes binarize to black lines
    let bytes = png(&[
        "...g...",
        "...g...",
        "gggg...",
        ".......",
    ]);
    let mut session = Session::default();
    session.load(&bytes).unwrap();
    rp.compare_values(2.0, session.controls().len() as f64, 0.0);
    let canvas = session.canvas().unwrap();
    rp.write_raster(&canvas).unwrap();
    rp.compare_values(1.0, regionpaint::threshold::is_binary(&canvas) as u8 as f64, 0.0);

    // region1 is the upper-left pocket, region2 the rest
    rp.compare_values(1.0, (session.lookup(0, 0) == Some(key("region1"))) as u8 as f64, 0.0);
    rp.compare_values(1.0, (session.lookup(0, 3) == Some(key("region2"))) as u8 as f64, 0.0);
    rp.compare_values(1.0, (session.lookup(6, 0) == Some(key("region2"))) as u8 as f64, 0.0);
    rp.compare_values(1.0, session.lookup(3, 1).is_none() as u8 as f64, 0.0);

    // picker change recolors immediately
    session.pick(key("region1"), red).unwrap();
    rp.compare_strings(
        b"#ff0000",
        session.color_of(key("region1")).unwrap().to_string().as_bytes(),
    );

    // click applies the control value
    session.set_control(key("region2"), green).unwrap();
    let hit = session.click(6, 3).unwrap();
    rp.compare_values(1.0, (hit == Some(key("region2"))) as u8 as f64, 0.0);

    let mut expected = raster_from_rows(&["rrr#...", "rrr#...", "####...", "......."])
        .unwrap()
        .to_mut();
    for pixel in expected.data_mut() {
        if *pixel == Color::WHITE.to_pixel() {
            *pixel = green.to_pixel();
        }
    }
    let expected: Raster = expected.into();
    rp.compare_raster(&expected, &session.canvas().unwrap());

    // export is lossless
    let exported = read_image_mem(&session.export_png().unwrap()).unwrap();
    rp.write_raster(&exported).unwrap();
    rp.compare_raster(&expected, &exported);

    // a broken upload leaves everything in place
    let mut broken = bytes.clone();
    broken.truncate(bytes.len() / 2);
    let result = session.load(&broken);
    rp.compare_values(1.0, matches!(result, Err(Error::Io(_))) as u8 as f64, 0.0);
    rp.compare_raster(&expected, &session.canvas().unwrap());

    // so does a BMP header declaring a gigapixel image in 54 bytes
    let mut huge = Vec::with_capacity(54);
    huge.extend_from_slice(b"BM");
    huge.extend_from_slice(&54u32.to_le_bytes());
    huge.extend_from_slice(&[0; 4]);
    huge.extend_from_slice(&54u32.to_le_bytes());
    huge.extend_from_slice(&40u32.to_le_bytes());
    huge.extend_from_slice(&1_000_000_000i32.to_le_bytes());
    huge.extend_from_slice(&1_000_000_000i32.to_le_bytes());
    huge.extend_from_slice(&1u16.to_le_bytes());
    huge.extend_from_slice(&24u16.to_le_bytes());
    huge.extend_from_slice(&[0; 24]);
    let result = session.load(&huge);
    rp.compare_values(1.0, matches!(result, Err(Error::Io(_))) as u8 as f64, 0.0);
    rp.compare_values(0.0, session.is_busy() as u8 as f64, 0.0);
    rp.compare_raster(&expected, &session.canvas().unwrap());

    // a new image replaces regions and colors wholesale
    session.load(&png(&["....", "...."])).unwrap();
    rp.compare_values(1.0, session.controls().len() as f64, 0.0);
    rp.compare_values(
        1.0,
        (session.color_of(key("region1")).unwrap() == Color::WHITE) as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup());
}

#[test]
fn session_chunked_load_reg() {
    let mut rp = RegParams::new("session_chunked");
    let options = SessionOptions::default()
        .with_threshold(ThresholdMethod::Otsu)
        .with_label(LabelOptions::default().with_chunk(5));
    let mut session = Session::new(options);

    session
        .begin_load(&png(&[".#..", ".#..", ".###", "...."]))
        .unwrap();
    let mut polls = 0;
    let mut last = 0.0;
    loop {
        match session.poll_load().unwrap() {
            LoadStatus::Loading(progress) => {
                rp.compare_values(1.0, (progress.fraction() >= last) as u8 as f64, 0.0);
                last = progress.fraction();
                // pointer input is ignored mid-load
                rp.compare_values(1.0, session.click(0, 0).unwrap().is_none() as u8 as f64, 0.0);
            }
            LoadStatus::Ready { regions } => {
                rp.compare_values(2.0, regions as f64, 0.0);
                break;
            }
            LoadStatus::Idle => panic!("load vanished"),
        }
        polls += 1;
    }
    eprintln!("load finished after {} polls", polls);
    rp.compare_values(1.0, (polls > 1) as u8 as f64, 0.0);

    // the pocket to the upper right of the L is region2
    rp.compare_values(1.0, (session.lookup(3, 0) == Some(key("region2"))) as u8 as f64, 0.0);
    rp.compare_values(1.0, (session.lookup(0, 3) == Some(key("region1"))) as u8 as f64, 0.0);

    assert!(rp.cleanup());
}
