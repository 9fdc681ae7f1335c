//! regionpaint - Coloring book engine for line art
//!
//! Load a drawing, reduce it to black lines on white, find every enclosed
//! white area and paint each one independently.
//!
//! # Overview
//!
//! - Image I/O (PNG, JPEG, BMP, and anything the `image` crate decodes)
//! - Binarization with a fixed luminance threshold or Otsu's method
//! - Flood-fill labeling of 4-connected background regions
//! - Per-region colors, hit testing, and recoloring
//! - An interactive [`Session`] tying these together
//!
//! # Example
//!
//! ```
//! use regionpaint::{Color, Raster, Session};
//!
//! // 3x3 white canvas with a black middle column
//! let mut drawing = Raster::new_filled(3, 3, Color::WHITE).unwrap().to_mut();
//! for y in 0..3 {
//!     drawing.set_pixel(1, y, Color::BLACK.to_pixel()).unwrap();
//! }
//!
//! let mut session = Session::default();
//! session.load_raster(&drawing.into()).unwrap();
//! assert_eq!(session.controls().len(), 2);
//!
//! let right = session.lookup(2, 0).unwrap();
//! session.pick(right, "#ff0000".parse().unwrap()).unwrap();
//! assert_eq!(session.color_of(right).unwrap().to_string(), "#ff0000");
//! ```

pub mod error;
pub mod options;
pub mod session;

// Re-export core types (primary data structures used everywhere)
pub use regionpaint_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use regionpaint_color as threshold;
pub use regionpaint_io as io;
pub use regionpaint_region as region;

// Re-export session types
pub use error::{Error, Result};
pub use options::SessionOptions;
pub use regionpaint_region::{RegionKey, RegionStore};
pub use session::{ColorControl, LoadStatus, Session};
