//! regionpaint-region - Region labeling and recoloring
//!
//! This crate turns a binarized line drawing into paintable regions:
//!
//! - **Labeling** - Flood fill of background pixels into 4-connected regions
//! - **Region store** - Per-region fill colors and O(1) coordinate lookup
//! - **Recoloring** - Painting regions onto a canvas
//!
//! # Examples
//!
//! ```
//! use regionpaint_region::{LabelOptions, RegionStore, label_regions, recolor};
//! use regionpaint_core::{Color, Raster};
//!
//! // White 3x3 canvas with a black middle column
//! let mut canvas = Raster::new_filled(3, 3, Color::WHITE).unwrap().to_mut();
//! for y in 0..3 {
//!     canvas.set_pixel(1, y, Color::BLACK.to_pixel()).unwrap();
//! }
//!
//! let labeling = label_regions(&canvas.snapshot(), &LabelOptions::default()).unwrap();
//! assert_eq!(labeling.regions.len(), 2);
//!
//! let mut store = RegionStore::from_labeling(labeling).unwrap();
//! let right = store.lookup(2, 1).unwrap();
//! recolor(&mut canvas, &mut store, right, Color::new(255, 0, 0)).unwrap();
//! assert_eq!(canvas.get_rgb(2, 2), Some((255, 0, 0)));
//! ```

pub mod error;
pub mod label;
pub mod recolor;
pub mod region;
pub mod store;

// Re-export core types
pub use regionpaint_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export label types and functions
pub use label::{
    DEFAULT_CHUNK, DEFAULT_TOLERANCE, LabelJob, LabelOptions, LabelProgress, Labeling,
    VisitedMask, label_regions, label_rgba,
};

// Re-export region types
pub use region::{Region, RegionKey, RegionMap};

// Re-export store
pub use store::RegionStore;

// Re-export recolor functions
pub use recolor::{paint_at, preview, recolor, repaint};
