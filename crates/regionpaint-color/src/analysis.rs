//! Raster analysis helpers

use regionpaint_core::{Color, Raster, color};

/// Check whether every pixel's RGB channels are each 0 or 255 and equal,
/// i.e. the raster is pure black and white.
pub fn is_binary(raster: &Raster) -> bool {
    raster.data().iter().all(|&pixel| {
        let (r, g, b) = color::extract_rgb(pixel);
        (r == 0 || r == 255) && r == g && g == b
    })
}

/// Count pixels whose RGB channels are each within `tolerance` of `target`.
pub fn count_matching(raster: &Raster, target: Color, tolerance: u8) -> usize {
    raster
        .data()
        .iter()
        .filter(|&&pixel| color::rgb_within(pixel, target, tolerance))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_binary() {
        let mut r = Raster::new_filled(2, 2, Color::WHITE).unwrap().to_mut();
        r.set_rgb(0, 0, 0, 0, 0).unwrap();
        let raster: Raster = r.into();
        assert!(is_binary(&raster));

        let mut r = raster.to_mut();
        r.set_rgb(1, 1, 255, 0, 255).unwrap();
        assert!(!is_binary(&r.into()));
    }

    #[test]
    fn test_count_matching() {
        let mut r = Raster::new_filled(3, 1, Color::WHITE).unwrap().to_mut();
        r.set_rgb(0, 0, 250, 250, 250).unwrap();
        r.set_rgb(1, 0, 200, 255, 255).unwrap();
        let raster: Raster = r.into();
        assert_eq!(count_matching(&raster, Color::WHITE, 10), 2);
        assert_eq!(count_matching(&raster, Color::WHITE, 0), 1);
    }
}
