//! Packed pixel helpers and fill colors.
//!
//! # Pixel format
//!
//! Raster pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
//!
//! # Fill colors
//!
//! [`Color`] is the opaque RGB value a region is painted with. It parses
//! from the strings a color picker produces (`#rrggbb`, `#rgb`) and from
//! CSS color names, and always displays as lowercase `#rrggbb`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Red channel (MSB, byte 0)
pub const RED: usize = 0;
/// Green channel (byte 1)
pub const GREEN: usize = 1;
/// Blue channel (byte 2)
pub const BLUE: usize = 2;
/// Alpha channel (LSB, byte 3)
pub const ALPHA: usize = 3;

/// Shift amounts for extracting color channels
pub const RED_SHIFT: u32 = 24;
pub const GREEN_SHIFT: u32 = 16;
pub const BLUE_SHIFT: u32 = 8;
pub const ALPHA_SHIFT: u32 = 0;

/// Extract red component from a packed pixel.
#[inline]
pub fn red(pixel: u32) -> u8 {
    ((pixel >> RED_SHIFT) & 0xff) as u8
}

/// Extract green component from a packed pixel.
#[inline]
pub fn green(pixel: u32) -> u8 {
    ((pixel >> GREEN_SHIFT) & 0xff) as u8
}

/// Extract blue component from a packed pixel.
#[inline]
pub fn blue(pixel: u32) -> u8 {
    ((pixel >> BLUE_SHIFT) & 0xff) as u8
}

/// Extract alpha component from a packed pixel.
#[inline]
pub fn alpha(pixel: u32) -> u8 {
    ((pixel >> ALPHA_SHIFT) & 0xff) as u8
}

/// Compose an opaque packed pixel (alpha = 255).
#[inline]
pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
    compose_rgba(r, g, b, 255)
}

/// Compose a packed RGBA pixel.
#[inline]
pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << RED_SHIFT)
        | ((g as u32) << GREEN_SHIFT)
        | ((b as u32) << BLUE_SHIFT)
        | ((a as u32) << ALPHA_SHIFT)
}

/// Extract RGB values from a packed pixel.
#[inline]
pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
    (red(pixel), green(pixel), blue(pixel))
}

/// Extract RGBA values from a packed pixel.
#[inline]
pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
    (red(pixel), green(pixel), blue(pixel), alpha(pixel))
}

/// Perceptual luminance `0.299 R + 0.587 G + 0.114 B`.
///
/// The result lies in `[0.0, 255.0]`.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Check whether every RGB channel of `pixel` is within `tolerance` of
/// `target`. Alpha is ignored.
#[inline]
pub fn rgb_within(pixel: u32, target: Color, tolerance: u8) -> bool {
    let (r, g, b) = extract_rgb(pixel);
    r.abs_diff(target.r) <= tolerance
        && g.abs_diff(target.g) <= tolerance
        && b.abs_diff(target.b) <= tolerance
}

/// An opaque RGB fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Background white.
    pub const WHITE: Color = Color::new(255, 255, 255);
    /// Foreground black.
    pub const BLACK: Color = Color::new(0, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed opaque pixel for this color.
    #[inline]
    pub fn to_pixel(self) -> u32 {
        compose_rgb(self.r, self.g, self.b)
    }

    /// RGB part of a packed pixel.
    #[inline]
    pub fn from_pixel(pixel: u32) -> Self {
        let (r, g, b) = extract_rgb(pixel);
        Self { r, g, b }
    }

    fn from_hex(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
                let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|&(_, c)| c)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(digits) => Self::from_hex(digits),
            None => Self::from_name(trimmed).or_else(|| Self::from_hex(trimmed)),
        };
        parsed.ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

/// CSS color names accepted by [`Color::from_str`].
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::new(0, 0, 0)),
    ("silver", Color::new(192, 192, 192)),
    ("gray", Color::new(128, 128, 128)),
    ("grey", Color::new(128, 128, 128)),
    ("white", Color::new(255, 255, 255)),
    ("maroon", Color::new(128, 0, 0)),
    ("red", Color::new(255, 0, 0)),
    ("purple", Color::new(128, 0, 128)),
    ("fuchsia", Color::new(255, 0, 255)),
    ("magenta", Color::new(255, 0, 255)),
    ("green", Color::new(0, 128, 0)),
    ("lime", Color::new(0, 255, 0)),
    ("olive", Color::new(128, 128, 0)),
    ("yellow", Color::new(255, 255, 0)),
    ("navy", Color::new(0, 0, 128)),
    ("blue", Color::new(0, 0, 255)),
    ("teal", Color::new(0, 128, 128)),
    ("aqua", Color::new(0, 255, 255)),
    ("cyan", Color::new(0, 255, 255)),
    ("orange", Color::new(255, 165, 0)),
    ("pink", Color::new(255, 192, 203)),
    ("brown", Color::new(165, 42, 42)),
    ("lightgray", Color::new(211, 211, 211)),
    ("lightgrey", Color::new(211, 211, 211)),
];
