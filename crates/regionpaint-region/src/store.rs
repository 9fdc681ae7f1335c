//! Region store: per-region colors and coordinate lookup
//!
//! A [`RegionStore`] owns the region map of one labeled raster together
//! with the fill color of every region and a reverse index from pixel
//! coordinate to region key, so that hit tests are O(1).

use crate::error::{RegionError, RegionResult};
use crate::label::Labeling;
use crate::region::{Region, RegionKey, RegionMap};
use regionpaint_core::Color;

/// Region map plus current fill colors of one raster
#[derive(Debug, Clone)]
pub struct RegionStore {
    width: u32,
    height: u32,
    regions: RegionMap,
    colors: Vec<Color>,
    /// Row-major key number per pixel, 0 for pixels owned by no region
    index: Vec<u32>,
}

impl RegionStore {
    /// Build a store for a `width` x `height` raster.
    ///
    /// Every region pixel must lie inside the raster and belong to exactly
    /// one region. All regions start white.
    pub fn new(regions: RegionMap, width: u32, height: u32) -> RegionResult<Self> {
        let mut index = vec![0u32; width as usize * height as usize];
        for region in &regions {
            for p in region.pixels() {
                if p.x >= width || p.y >= height {
                    return Err(RegionError::InvalidRaster(format!(
                        "{} pixel {} outside {}x{} raster",
                        region.key(),
                        p,
                        width,
                        height
                    )));
                }
                let slot = &mut index[p.y as usize * width as usize + p.x as usize];
                if *slot != 0 {
                    return Err(RegionError::InvalidParameters(format!(
                        "pixel {} claimed by region{} and {}",
                        p,
                        slot,
                        region.key()
                    )));
                }
                *slot = region.key().number();
            }
        }

        let colors = vec![Color::WHITE; regions.len()];
        Ok(Self {
            width,
            height,
            regions,
            colors,
            index,
        })
    }

    /// Build a store from a finished labeling.
    pub fn from_labeling(labeling: Labeling) -> RegionResult<Self> {
        let (width, height) = (labeling.width(), labeling.height());
        Self::new(labeling.regions, width, height)
    }

    /// Width of the raster the regions were labeled from
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the raster the regions were labeled from
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the store holds no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The underlying region map
    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = RegionKey> + '_ {
        self.regions.keys()
    }

    /// Regions with their current colors, in key order
    pub fn iter(&self) -> impl Iterator<Item = (&Region, Color)> + '_ {
        self.regions.iter().zip(self.colors.iter().copied())
    }

    /// Region owning the pixel at (x, y).
    ///
    /// Coordinates outside the raster and pixels that belong to no region
    /// give `None`.
    pub fn lookup(&self, x: i64, y: i64) -> Option<RegionKey> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        match self.index[y as usize * self.width as usize + x as usize] {
            0 => None,
            n => Some(RegionKey::from_number(n)),
        }
    }

    fn check(&self, key: RegionKey) -> RegionResult<()> {
        if self.regions.contains_key(key) {
            Ok(())
        } else {
            Err(RegionError::UnknownRegion(key.to_string()))
        }
    }

    /// Region with the given key
    pub fn region(&self, key: RegionKey) -> RegionResult<&Region> {
        self.regions
            .get(key)
            .ok_or_else(|| RegionError::UnknownRegion(key.to_string()))
    }

    /// Current color of a region
    pub fn color_of(&self, key: RegionKey) -> RegionResult<Color> {
        self.check(key)?;
        Ok(self.colors[key.index()])
    }

    /// Record a new color for a region. Does not touch any raster.
    pub fn set_color(&mut self, key: RegionKey, color: Color) -> RegionResult<()> {
        self.check(key)?;
        self.colors[key.index()] = color;
        Ok(())
    }
}
