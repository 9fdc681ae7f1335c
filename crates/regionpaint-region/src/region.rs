//! Regions and region maps
//!
//! A [`Region`] is one maximal 4-connected set of background pixels. Its
//! [`RegionKey`] is assigned in discovery order (`region1`, `region2`, ...)
//! and stays valid for the lifetime of the raster it was labeled from.

use crate::error::{RegionError, RegionResult};
use regionpaint_core::{Bounds, Point};
use std::fmt;
use std::str::FromStr;

const KEY_PREFIX: &str = "region";

/// Opaque, stable identifier of a region.
///
/// Displays as `region<n>` with `n >= 1` and parses back from that form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey(u32);

impl RegionKey {
    /// Key of the `number`-th discovered region (1-based).
    pub(crate) fn from_number(number: u32) -> Self {
        debug_assert!(number >= 1);
        RegionKey(number)
    }

    /// 1-based discovery number.
    pub fn number(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", KEY_PREFIX, self.0)
    }
}

impl FromStr for RegionKey {
    type Err = RegionError;

    fn from_str(s: &str) -> RegionResult<Self> {
        s.strip_prefix(KEY_PREFIX)
            .filter(|digits| {
                !digits.is_empty()
                    && !digits.starts_with('0')
                    && digits.bytes().all(|c| c.is_ascii_digit())
            })
            .and_then(|digits| digits.parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .map(RegionKey)
            .ok_or_else(|| RegionError::InvalidKey(s.to_string()))
    }
}

/// A labeled region: its key and the pixels it owns, in flood-fill
/// discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    key: RegionKey,
    pixels: Vec<Point>,
}

impl Region {
    /// The region's key.
    pub fn key(&self) -> RegionKey {
        self.key
    }

    /// Pixels in discovery order.
    pub fn pixels(&self) -> &[Point] {
        &self.pixels
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false for regions held by a [`RegionMap`].
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounding box of the region.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.pixels)
    }

    /// Linear membership test. Prefer [`crate::RegionStore::lookup`].
    pub fn contains(&self, p: Point) -> bool {
        self.pixels.contains(&p)
    }
}

/// Region key → region, in key order.
///
/// Keys are dense: the map holds `region1..=regionN` for `N = len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionMap {
    regions: Vec<Region>,
}

impl RegionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region under the next key. Empty pixel lists are
    /// discarded and consume no key.
    pub fn insert(&mut self, pixels: Vec<Point>) -> Option<RegionKey> {
        if pixels.is_empty() {
            return None;
        }
        let key = RegionKey::from_number(self.regions.len() as u32 + 1);
        self.regions.push(Region { key, pixels });
        Some(key)
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no region was found.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Look up a region by key.
    pub fn get(&self, key: RegionKey) -> Option<&Region> {
        self.regions.get(key.index())
    }

    /// Whether `key` names a region in this map.
    pub fn contains_key(&self, key: RegionKey) -> bool {
        key.index() < self.regions.len()
    }

    /// Regions in key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = RegionKey> + '_ {
        self.regions.iter().map(Region::key)
    }

    /// Total number of pixels over all regions.
    pub fn pixel_count(&self) -> usize {
        self.regions.iter().map(Region::len).sum()
    }
}

impl<'a> IntoIterator for &'a RegionMap {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
