//! Pixel access functions
//!
//! Getters return `None` for coordinates outside the raster; setters
//! return [`Error::IndexOutOfBounds`].

use super::{Raster, RasterData, RasterMut};
use crate::color;
use crate::error::{Error, Result};

impl RasterData {
    fn out_of_bounds(&self, x: u32, y: u32) -> Error {
        Error::IndexOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn get(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.data[i])
    }

    fn set(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        let i = self.index(x, y).ok_or_else(|| self.out_of_bounds(x, y))?;
        self.data[i] = val;
        Ok(())
    }
}

impl Raster {
    /// Get the packed pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner.get(x, y)
    }

    /// Get the packed pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.data[y as usize * self.inner.width as usize + x as usize]
    }

    /// Get RGB values at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.get_pixel(x, y).map(color::extract_rgb)
    }

    /// Get RGBA values at (x, y).
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        self.get_pixel(x, y).map(color::extract_rgba)
    }
}

impl RasterMut {
    /// Get the packed pixel at (x, y).
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner.get(x, y)
    }

    /// Get RGB values at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.get_pixel(x, y).map(color::extract_rgb)
    }

    /// Set the packed pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        self.inner.set(x, y, val)
    }

    /// Set the packed pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let width = self.inner.width as usize;
        self.inner.data[y as usize * width + x as usize] = val;
    }

    /// Set an opaque RGB pixel at (x, y).
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }

    /// Set an RGBA pixel at (x, y).
    pub fn set_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        self.set_pixel(x, y, color::compose_rgba(r, g, b, a))
    }
}
