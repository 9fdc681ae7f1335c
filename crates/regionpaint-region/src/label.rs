//! Connected-component labeling of background pixels
//!
//! Every pixel whose RGB channels are all within `tolerance` of the target
//! color (white by default) is background. Background pixels are grouped
//! into maximal 4-connected regions by breadth-first flood fill.
//!
//! # Scan order
//!
//! Seeds are taken in **column-major** order: `x` is the outer loop and `y`
//! the inner one. Region keys therefore follow the left-most column in
//! which each region first appears, top to bottom within that column.
//! Within a region, pixels are listed in BFS order with neighbors probed
//! left, right, up, down.
//!
//! The input raster is never modified; visited state lives in a separate
//! [`VisitedMask`].
//!
//! # Cooperative scheduling
//!
//! [`LabelJob`] performs the scan in bounded steps so that a caller can
//! interleave labeling of a large image with other work. [`label_regions`]
//! runs a job to completion in one call.

use crate::error::{RegionError, RegionResult};
use crate::region::RegionMap;
use regionpaint_core::{Color, Point, Raster, color};
use std::collections::VecDeque;

/// Default per-channel tolerance for background matching
pub const DEFAULT_TOLERANCE: u8 = 10;

/// Default number of pixel visits per [`LabelJob::step`]
pub const DEFAULT_CHUNK: usize = 1 << 16;

/// Options for region labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOptions {
    /// Background color to match
    pub target: Color,
    /// Maximum absolute difference per RGB channel
    pub tolerance: u8,
    /// Pixel visits per scheduling step
    pub chunk: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            target: Color::WHITE,
            tolerance: DEFAULT_TOLERANCE,
            chunk: DEFAULT_CHUNK,
        }
    }
}

impl LabelOptions {
    /// Set the background color
    pub fn with_target(mut self, target: Color) -> Self {
        self.target = target;
        self
    }

    /// Set the per-channel tolerance
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the step size. Zero is clamped to one.
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }
}

/// Per-pixel visited flags of a finished labeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitedMask {
    width: u32,
    height: u32,
    flags: Vec<bool>,
}

impl VisitedMask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flags: vec![false; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether (x, y) has been visited. Out of bounds is `false`.
    pub fn is_visited(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.flags[self.index(x, y)]
    }

    /// Number of visited pixels
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&v| v).count()
    }

    /// Whether every pixel has been visited
    pub fn is_complete(&self) -> bool {
        self.flags.iter().all(|&v| v)
    }
}

/// Result of labeling a raster
#[derive(Debug, Clone)]
pub struct Labeling {
    /// Regions in key order
    pub regions: RegionMap,
    /// Visited flags; complete after labeling
    pub visited: VisitedMask,
}

impl Labeling {
    /// Width of the labeled raster
    pub fn width(&self) -> u32 {
        self.visited.width
    }

    /// Height of the labeled raster
    pub fn height(&self) -> u32 {
        self.visited.height
    }
}

/// Progress report of a [`LabelJob`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelProgress {
    /// Pixels marked visited so far
    pub visited: usize,
    /// Total pixels in the raster
    pub total: usize,
    /// Whether the scan has finished
    pub done: bool,
}

impl LabelProgress {
    /// Completed fraction in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.visited as f64 / self.total as f64
        }
    }
}

/// An in-progress labeling of one raster.
///
/// Each call to [`step`](Self::step) performs at most `budget` units of
/// work, where a unit is either one scan position or one dequeued pixel.
pub struct LabelJob {
    raster: Raster,
    options: LabelOptions,
    visited: VisitedMask,
    visited_count: usize,
    /// Next scan position in column-major order
    scan: usize,
    queue: VecDeque<Point>,
    current: Vec<Point>,
    regions: RegionMap,
}

impl LabelJob {
    /// Prepare a labeling of `raster`.
    pub fn new(raster: Raster, options: LabelOptions) -> RegionResult<Self> {
        let (width, height) = (raster.width(), raster.height());
        if width == 0 || height == 0 {
            return Err(RegionError::InvalidRaster(format!(
                "cannot label a {}x{} raster",
                width, height
            )));
        }
        log::debug!(
            "labeling {}x{} raster (target {}, tolerance {})",
            width,
            height,
            options.target,
            options.tolerance
        );
        Ok(Self {
            raster,
            options,
            visited: VisitedMask::new(width, height),
            visited_count: 0,
            scan: 0,
            queue: VecDeque::new(),
            current: Vec::new(),
            regions: RegionMap::new(),
        })
    }

    /// Options the job was created with
    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    /// Current progress
    pub fn progress(&self) -> LabelProgress {
        LabelProgress {
            visited: self.visited_count,
            total: self.raster.pixel_count(),
            done: self.is_done(),
        }
    }

    /// Whether all pixels have been scanned and the last flood is closed
    pub fn is_done(&self) -> bool {
        self.scan >= self.raster.pixel_count() && self.queue.is_empty() && self.current.is_empty()
    }

    #[inline]
    fn is_background(&self, x: u32, y: u32) -> bool {
        color::rgb_within(
            self.raster.get_pixel_unchecked(x, y),
            self.options.target,
            self.options.tolerance,
        )
    }

    #[inline]
    fn mark(&mut self, x: u32, y: u32) -> bool {
        let idx = self.visited.index(x, y);
        if self.visited.flags[idx] {
            return false;
        }
        self.visited.flags[idx] = true;
        self.visited_count += 1;
        true
    }

    /// Add `p` to the current flood and enqueue its matching neighbors.
    fn expand(&mut self, p: Point) {
        if !self.is_background(p.x, p.y) {
            return;
        }
        self.current.push(p);

        let (w, h) = (self.raster.width(), self.raster.height());
        let mut neighbors = [None; 4];
        if p.x > 0 {
            neighbors[0] = Some(Point::new(p.x - 1, p.y));
        }
        if p.x + 1 < w {
            neighbors[1] = Some(Point::new(p.x + 1, p.y));
        }
        if p.y > 0 {
            neighbors[2] = Some(Point::new(p.x, p.y - 1));
        }
        if p.y + 1 < h {
            neighbors[3] = Some(Point::new(p.x, p.y + 1));
        }

        for n in neighbors.into_iter().flatten() {
            if !self.visited.is_visited(n.x, n.y) && self.is_background(n.x, n.y) {
                self.mark(n.x, n.y);
                self.queue.push_back(n);
            }
        }
    }

    fn close_region(&mut self) {
        let pixels = std::mem::take(&mut self.current);
        let count = pixels.len();
        if let Some(key) = self.regions.insert(pixels) {
            log::trace!("{} closed with {} pixels", key, count);
        }
    }

    /// Advance the scan by at most `budget` units of work.
    pub fn step(&mut self, budget: usize) -> LabelProgress {
        let total = self.raster.pixel_count();
        let height = self.raster.height() as usize;
        let mut work = 0;

        while work < budget {
            if let Some(p) = self.queue.pop_front() {
                self.expand(p);
                work += 1;
                continue;
            }
            if !self.current.is_empty() {
                self.close_region();
            }
            if self.scan >= total {
                break;
            }

            let x = (self.scan / height) as u32;
            let y = (self.scan % height) as u32;
            self.scan += 1;
            work += 1;

            if self.mark(x, y) && self.is_background(x, y) {
                self.queue.push_back(Point::new(x, y));
            }
        }

        if self.queue.is_empty() && !self.current.is_empty() {
            self.close_region();
        }

        let progress = self.progress();
        log::debug!(
            "label step: {}/{} pixels visited, {} regions",
            progress.visited,
            progress.total,
            self.regions.len()
        );
        progress
    }

    /// Run the remaining work and return the labeling.
    ///
    /// The result is only ever produced for a fully scanned raster.
    pub fn finish(mut self) -> Labeling {
        while !self.is_done() {
            self.step(usize::MAX);
        }
        log::debug!(
            "labeling found {} regions covering {} pixels",
            self.regions.len(),
            self.regions.pixel_count()
        );
        Labeling {
            regions: self.regions,
            visited: self.visited,
        }
    }
}

/// Label all background regions of `raster`.
///
/// Seeds are scanned column-major (see the module documentation).
pub fn label_regions(raster: &Raster, options: &LabelOptions) -> RegionResult<Labeling> {
    Ok(LabelJob::new(raster.clone(), *options)?.finish())
}

/// Label a raw RGBA byte buffer of `width * height * 4` bytes.
///
/// Zero dimensions or a buffer of the wrong length are rejected before any
/// pixel is scanned.
pub fn label_rgba(
    width: u32,
    height: u32,
    bytes: &[u8],
    options: &LabelOptions,
) -> RegionResult<Labeling> {
    if width == 0 || height == 0 {
        return Err(RegionError::InvalidRaster(format!(
            "zero dimension: {}x{}",
            width, height
        )));
    }
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        return Err(RegionError::InvalidRaster(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            expected,
            width,
            height,
            bytes.len()
        )));
    }
    let raster = Raster::from_rgba_bytes(width, height, bytes)?;
    label_regions(&raster, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionKey;

    /// '.' white, '#' black
    fn raster(rows: &[&str]) -> Raster {
        let width = rows[0].len() as u32;
        let mut r = Raster::new(width, rows.len() as u32).unwrap().to_mut();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let color = if c == '.' { Color::WHITE } else { Color::BLACK };
                r.set_pixel(x as u32, y as u32, color.to_pixel()).unwrap();
            }
        }
        r.into()
    }

    fn key(n: u32) -> RegionKey {
        RegionKey::from_number(n)
    }

    #[test]
    fn test_all_white_single_region() {
        let l = label_regions(&raster(&["...", "...", "..."]), &LabelOptions::default()).unwrap();
        assert_eq!(l.regions.len(), 1);
        assert_eq!(l.regions.get(key(1)).unwrap().len(), 9);
        assert!(l.visited.is_complete());
    }

    #[test]
    fn test_bfs_pixel_order() {
        // seed (0,0); left/right/up/down probing from there
        let l = label_regions(&raster(&["..", ".."]), &LabelOptions::default()).unwrap();
        let pixels = l.regions.get(key(1)).unwrap().pixels().to_vec();
        assert_eq!(
            pixels,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(0, 1),
                Point::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_column_major_key_order() {
        // column 0 is scanned first, so the bottom-left pixel is region1
        let r = raster(&["#.#", "###", ".##"]);
        let l = label_regions(&r, &LabelOptions::default()).unwrap();
        assert_eq!(l.regions.len(), 2);
        assert_eq!(l.regions.get(key(1)).unwrap().pixels(), &[Point::new(0, 2)]);
        assert_eq!(l.regions.get(key(2)).unwrap().pixels(), &[Point::new(1, 0)]);
    }

    #[test]
    fn test_all_black_no_regions() {
        let l = label_regions(&raster(&["##", "##"]), &LabelOptions::default()).unwrap();
        assert!(l.regions.is_empty());
        assert!(l.visited.is_complete());
    }

    #[test]
    fn test_tolerance_and_alpha() {
        let mut r = Raster::new(3, 1).unwrap().to_mut();
        r.set_rgba(0, 0, 245, 250, 255, 0).unwrap();
        r.set_rgba(1, 0, 244, 255, 255, 255).unwrap();
        r.set_rgba(2, 0, 255, 255, 255, 10).unwrap();
        let l = label_regions(&r.into(), &LabelOptions::default()).unwrap();
        assert_eq!(l.regions.len(), 2);
        assert_eq!(l.regions.get(key(1)).unwrap().pixels(), &[Point::new(0, 0)]);
        assert_eq!(l.regions.get(key(2)).unwrap().pixels(), &[Point::new(2, 0)]);
    }

    #[test]
    fn test_custom_target() {
        let r = raster(&["#.", ".#"]);
        let opts = LabelOptions::default().with_target(Color::BLACK).with_tolerance(0);
        let l = label_regions(&r, &opts).unwrap();
        assert_eq!(l.regions.len(), 2);
    }

    #[test]
    fn test_input_not_mutated() {
        let r = raster(&[".#.", "..."]);
        let before = r.to_rgba_bytes();
        label_regions(&r, &LabelOptions::default()).unwrap();
        assert_eq!(r.to_rgba_bytes(), before);
    }

    #[test]
    fn test_stepping_matches_one_shot() {
        let r = raster(&[".#..", ".#.#", "...#", "##.."]);
        let one_shot = label_regions(&r, &LabelOptions::default()).unwrap();

        let mut job = LabelJob::new(r.clone(), LabelOptions::default()).unwrap();
        let mut last = 0;
        let mut steps = 0;
        loop {
            let p = job.step(3);
            assert!(p.visited >= last);
            last = p.visited;
            steps += 1;
            if p.done {
                break;
            }
        }
        assert!(steps > 1);
        let stepped = job.finish();
        assert_eq!(stepped.regions, one_shot.regions);
        assert_eq!(stepped.visited, one_shot.visited);
    }

    #[test]
    fn test_zero_budget_makes_no_progress() {
        let r = raster(&["..", ".."]);
        let mut job = LabelJob::new(r, LabelOptions::default()).unwrap();
        let p = job.step(0);
        assert_eq!(p.visited, 0);
        assert!(!p.done);
        assert_eq!(p.fraction(), 0.0);
    }

    #[test]
    fn test_label_rgba_validation() {
        let opts = LabelOptions::default();
        assert!(matches!(
            label_rgba(0, 5, &[], &opts),
            Err(RegionError::InvalidRaster(_))
        ));
        assert!(matches!(
            label_rgba(2, 2, &[255; 15], &opts),
            Err(RegionError::InvalidRaster(_))
        ));
        let l = label_rgba(2, 2, &[255; 16], &opts).unwrap();
        assert_eq!(l.regions.len(), 1);
        assert_eq!(l.regions.pixel_count(), 4);
    }

    #[test]
    fn test_with_chunk_clamps_zero() {
        assert_eq!(LabelOptions::default().with_chunk(0).chunk, 1);
    }
}
