//! Region recoloring
//!
//! Paints every pixel of a region onto a canvas with an opaque color.
//! [`recolor`] also records the color in the store; [`preview`] only paints,
//! and [`repaint`] restores the canvas from the recorded colors.
//!
//! All operations validate the key and the canvas size before touching a
//! single pixel.

use crate::error::{RegionError, RegionResult};
use crate::region::{Region, RegionKey};
use crate::store::RegionStore;
use regionpaint_core::{Color, RasterMut};

fn check_canvas(canvas: &RasterMut, store: &RegionStore) -> RegionResult<()> {
    if canvas.width() != store.width() || canvas.height() != store.height() {
        return Err(regionpaint_core::Error::DimensionMismatch {
            expected: (store.width(), store.height()),
            actual: (canvas.width(), canvas.height()),
        }
        .into());
    }
    Ok(())
}

fn fill_region(canvas: &mut RasterMut, region: &Region, color: Color) {
    let pixel = color.to_pixel();
    for p in region.pixels() {
        canvas.set_pixel_unchecked(p.x, p.y, pixel);
    }
}

/// Paint a region with `color` (alpha 255) and record the color.
///
/// Repeating the call with the same color leaves canvas and store
/// unchanged. An unknown key fails with [`RegionError::UnknownRegion`]
/// and nothing is modified.
pub fn recolor(
    canvas: &mut RasterMut,
    store: &mut RegionStore,
    key: RegionKey,
    color: Color,
) -> RegionResult<()> {
    check_canvas(canvas, store)?;
    let region = store.region(key)?;
    let count = region.len();
    fill_region(canvas, region, color);
    store.set_color(key, color)?;
    log::debug!("{} recolored to {} ({} pixels)", key, color, count);
    Ok(())
}

/// Paint a region without recording the color.
///
/// Used for transient highlights; [`repaint`] undoes it.
pub fn preview(
    canvas: &mut RasterMut,
    store: &RegionStore,
    key: RegionKey,
    color: Color,
) -> RegionResult<()> {
    check_canvas(canvas, store)?;
    fill_region(canvas, store.region(key)?, color);
    Ok(())
}

/// Paint every region with its recorded color.
pub fn repaint(canvas: &mut RasterMut, store: &RegionStore) -> RegionResult<()> {
    check_canvas(canvas, store)?;
    for (region, color) in store.iter() {
        fill_region(canvas, region, color);
    }
    Ok(())
}

/// Recolor the region under (x, y).
///
/// Returns the key that was recolored, or `None` without touching the
/// canvas when the point hits no region.
pub fn paint_at(
    canvas: &mut RasterMut,
    store: &mut RegionStore,
    x: i64,
    y: i64,
    color: Color,
) -> RegionResult<Option<RegionKey>> {
    match store.lookup(x, y) {
        Some(key) => {
            recolor(canvas, store, key, color)?;
            Ok(Some(key))
        }
        None => {
            log::debug!("no region at ({}, {})", x, y);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelOptions, label_regions};
    use regionpaint_core::Raster;

    const RED: Color = Color::new(255, 0, 0);

    fn setup() -> (Raster, RegionStore) {
        // 2x1 white, one region of two pixels
        let raster = Raster::new_filled(2, 1, Color::WHITE).unwrap();
        let labeling = label_regions(&raster, &LabelOptions::default()).unwrap();
        (raster, RegionStore::from_labeling(labeling).unwrap())
    }

    #[test]
    fn test_recolor_region1_red() {
        let (raster, mut store) = setup();
        let mut canvas = raster.to_mut();
        let key: RegionKey = "region1".parse().unwrap();
        recolor(&mut canvas, &mut store, key, RED).unwrap();
        assert_eq!(store.color_of(key).unwrap().to_string(), "#ff0000");
        assert_eq!(canvas.get_rgb(0, 0), Some((255, 0, 0)));
        assert_eq!(canvas.get_rgb(1, 0), Some((255, 0, 0)));
    }

    #[test]
    fn test_alpha_forced_opaque() {
        let mut canvas = Raster::new(2, 1).unwrap().to_mut();
        canvas.set_rgba(0, 0, 255, 255, 255, 0).unwrap();
        canvas.set_rgba(1, 0, 255, 255, 255, 0).unwrap();
        let labeling = label_regions(&canvas.snapshot(), &LabelOptions::default()).unwrap();
        let mut store = RegionStore::from_labeling(labeling).unwrap();
        let key = store.keys().next().unwrap();
        recolor(&mut canvas, &mut store, key, RED).unwrap();
        assert_eq!(canvas.snapshot().get_rgba(1, 0), Some((255, 0, 0, 255)));
    }

    #[test]
    fn test_unknown_key_no_mutation() {
        let (raster, mut store) = setup();
        let mut canvas = raster.to_mut();
        let key: RegionKey = "region9".parse().unwrap();
        let err = recolor(&mut canvas, &mut store, key, RED).unwrap_err();
        assert!(matches!(err, RegionError::UnknownRegion(_)));
        assert!(canvas.snapshot().equals(&raster));
    }

    #[test]
    fn test_canvas_size_mismatch() {
        let (_, mut store) = setup();
        let mut canvas = Raster::new(3, 3).unwrap().to_mut();
        let key = store.keys().next().unwrap();
        assert!(matches!(
            recolor(&mut canvas, &mut store, key, RED),
            Err(RegionError::Core(_))
        ));
        assert_eq!(store.color_of(key).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_preview_then_repaint() {
        let (raster, store) = setup();
        let mut canvas = raster.to_mut();
        let key = store.keys().next().unwrap();
        preview(&mut canvas, &store, key, RED).unwrap();
        assert_eq!(canvas.get_rgb(0, 0), Some((255, 0, 0)));
        assert_eq!(store.color_of(key).unwrap(), Color::WHITE);
        repaint(&mut canvas, &store).unwrap();
        assert!(canvas.snapshot().equals(&raster));
    }

    #[test]
    fn test_paint_at_miss() {
        let (raster, mut store) = setup();
        let mut canvas = raster.to_mut();
        assert_eq!(paint_at(&mut canvas, &mut store, 5, 0, RED).unwrap(), None);
        assert_eq!(paint_at(&mut canvas, &mut store, -1, 0, RED).unwrap(), None);
        assert!(canvas.snapshot().equals(&raster));
        let hit = paint_at(&mut canvas, &mut store, 1, 0, RED).unwrap();
        assert_eq!(hit.map(|k| k.to_string()).as_deref(), Some("region1"));
    }
}
