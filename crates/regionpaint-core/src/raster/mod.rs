//! Raster - The main image container
//!
//! A `Raster` is a width×height grid of packed RGBA pixels.
//!
//! # Pixel layout
//!
//! - One `u32` per pixel, rows stored top to bottom
//! - Color order is RGBA (red in MSB), see [`crate::color`]
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to [`RasterMut`] via [`Raster::try_into_mut`]
//! or [`Raster::to_mut`], then convert back with `Into<Raster>`.

mod access;

use crate::color::{self, Color};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Internal raster data
#[derive(Debug, Clone, PartialEq, Eq)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Packed pixels, row-major
    data: Vec<u32>,
}

impl RasterData {
    fn filled(width: u32, height: u32, pixel: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            data: vec![pixel; len],
        })
    }

    fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize) * 4;
        if bytes.len() != expected {
            return Err(Error::BufferMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| color::compose_rgba(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for &pixel in &self.data {
            let (r, g, b, a) = color::extract_rgba(pixel);
            out.extend_from_slice(&[r, g, b, a]);
        }
        out
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

/// Raster - immutable, shared image
///
/// # Examples
///
/// ```
/// use regionpaint_core::{Color, Raster};
///
/// let raster = Raster::new_filled(4, 3, Color::WHITE).unwrap();
/// assert_eq!(raster.width(), 4);
/// assert_eq!(raster.height(), 3);
/// assert_eq!(raster.get_rgb(3, 2), Some((255, 255, 255)));
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster with every pixel set to transparent black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RasterData::filled(width, height, 0)?),
        })
    }

    /// Create a new raster with every pixel set to an opaque color.
    pub fn new_filled(width: u32, height: u32, fill: Color) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RasterData::filled(width, height, fill.to_pixel())?),
        })
    }

    /// Create a raster from a tightly packed RGBA byte buffer
    /// (4 bytes per pixel, rows top to bottom).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero dimension and
    /// [`Error::BufferMismatch`] if `bytes.len() != width * height * 4`.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RasterData::from_rgba_bytes(width, height, bytes)?),
        })
    }

    /// Export pixels as a tightly packed RGBA byte buffer.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.inner.to_rgba_bytes()
    }

    /// Get the raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.data.len()
    }

    /// Get raw access to the packed pixels.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Check if two rasters have the same width and height.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Check pixel-for-pixel equality.
    pub fn equals(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to get mutable access to the raster data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable raster
///
/// Allows modification of pixel data. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the raster width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the raster height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get raw access to the packed pixels.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the packed pixels.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Set every pixel to `pixel`.
    pub fn fill(&mut self, pixel: u32) {
        self.inner.data.fill(pixel);
    }

    /// Immutable copy of the current pixels.
    pub fn snapshot(&self) -> Raster {
        Raster {
            inner: Arc::new(self.inner.clone()),
        }
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster.inner),
        }
    }
}
