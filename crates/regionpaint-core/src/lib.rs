//! regionpaint-core - Basic data structures for region painting
//!
//! This crate provides the fundamental types used throughout the
//! regionpaint workspace:
//!
//! - [`Raster`] / [`RasterMut`] - The packed RGBA image (immutable / mutable)
//! - [`Color`] - Opaque fill color with hex / CSS-name parsing
//! - [`Point`] / [`Bounds`] - Pixel coordinates and rectangles
//! - [`color`] - Packed pixel helpers and luminance

pub mod color;
pub mod error;
pub mod point;
pub mod raster;

pub use color::Color;
pub use error::{Error, Result};
pub use point::{Bounds, Point};
pub use raster::{Raster, RasterMut};
