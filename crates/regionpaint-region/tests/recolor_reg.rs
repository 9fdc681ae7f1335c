//! Recolor regression test
//!
//! Recolor, preview and repaint on a labeled drawing, checking that only
//! the targeted region changes and that repeated operations are stable.

use regionpaint_core::{Color, Raster};
use regionpaint_region::{
    LabelOptions, RegionError, RegionKey, RegionStore, label_regions, paint_at, preview, recolor,
    repaint,
};
use regionpaint_test::{RegParams, raster_from_rows};

fn setup(rows: &[&str]) -> (Raster, RegionStore) {
    let raster = raster_from_rows(rows).unwrap();
    let labeling = label_regions(&raster, &LabelOptions::default()).unwrap();
    (raster, RegionStore::from_labeling(labeling).unwrap())
}

#[test]
fn recolor_reg() {
    let mut rp = RegParams::new("recolor");
    let red: Color = "#ff0000".parse().unwrap();
    let blue: Color = "blue".parse().unwrap();

    // --- 2x1 white: region1 to red ---
    let (raster, mut store) = setup(&[".."]);
    let mut canvas = raster.to_mut();
    let region1: RegionKey = "region1".parse().unwrap();
    recolor(&mut canvas, &mut store, region1, red).unwrap();
    rp.compare_strings(b"#ff0000", store.color_of(region1).unwrap().to_string().as_bytes());
    let expected = raster_from_rows(&["rr"]).unwrap();
    rp.compare_raster(&expected, &canvas.snapshot());

    // --- only the target region changes; foreground is untouched ---
    let (raster, mut store) = setup(&[".#.", ".#.", ".#."]);
    let mut canvas = raster.to_mut();
    let right = store.lookup(2, 0).unwrap();
    recolor(&mut canvas, &mut store, right, red).unwrap();
    let expected = raster_from_rows(&[".#r", ".#r", ".#r"]).unwrap();
    rp.compare_raster(&expected, &canvas.snapshot());
    rp.write_raster(&canvas.snapshot()).unwrap();

    // --- idempotent ---
    let once = canvas.snapshot();
    recolor(&mut canvas, &mut store, right, red).unwrap();
    rp.compare_raster(&once, &canvas.snapshot());
    rp.compare_values(
        1.0,
        (store.color_of(right).unwrap() == red) as u8 as f64,
        0.0,
    );

    // --- unknown key: error, canvas and colors unchanged ---
    let missing: RegionKey = "region3".parse().unwrap();
    let result = recolor(&mut canvas, &mut store, missing, blue);
    rp.compare_values(
        1.0,
        matches!(result, Err(RegionError::UnknownRegion(_))) as u8 as f64,
        0.0,
    );
    rp.compare_raster(&once, &canvas.snapshot());

    // --- preview does not persist; repaint restores ---
    let left = store.lookup(0, 0).unwrap();
    preview(&mut canvas, &store, left, blue).unwrap();
    rp.compare_values(
        1.0,
        (store.color_of(left).unwrap() == Color::WHITE) as u8 as f64,
        0.0,
    );
    repaint(&mut canvas, &store).unwrap();
    rp.compare_raster(&once, &canvas.snapshot());

    // --- paint_at: foreground and outside hits do nothing ---
    rp.compare_values(
        1.0,
        paint_at(&mut canvas, &mut store, 1, 1, blue).unwrap().is_none() as u8 as f64,
        0.0,
    );
    rp.compare_values(
        1.0,
        paint_at(&mut canvas, &mut store, 0, -4, blue).unwrap().is_none() as u8 as f64,
        0.0,
    );
    rp.compare_raster(&once, &canvas.snapshot());
    let hit = paint_at(&mut canvas, &mut store, 0, 2, blue).unwrap();
    rp.compare_values(1.0, (hit == Some(left)) as u8 as f64, 0.0);
    rp.compare_values(
        1.0,
        (canvas.get_rgb(0, 1) == Some((0, 0, 255))) as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup());
}
