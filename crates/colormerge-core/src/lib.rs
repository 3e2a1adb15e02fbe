//! colormerge Core - Basic data structures for region-merging segmentation
//!
//! This crate provides the fundamental data structures used throughout
//! the colormerge workspace:
//!
//! - [`Pix`] / [`PixMut`] - The RGB raster container (immutable / mutable)
//! - [`ImageFormat`] - File formats known to the I/O layer
//! - [`color`] - Channel helpers for packed 32-bit pixels and the [`Rgb`] triple

pub mod error;
pub mod pix;

pub use color::Rgb;
pub use error::{Error, Result};
pub use pix::{ImageFormat, Pix, PixMut};

/// Color channel indices and helper functions for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    use std::fmt;

    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 255)
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Extract RGBA values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Replace the RGB channels of a pixel, keeping its alpha.
    #[inline]
    pub fn with_rgb(pixel: u32, rgb: Rgb) -> u32 {
        compose_rgba(rgb.r, rgb.g, rgb.b, alpha(pixel))
    }

    /// An 8-bit-per-channel RGB triple.
    ///
    /// Displays as `r,g,b`, the form used in region statistics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Rgb {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Rgb {
        pub const BLACK: Rgb = Rgb::new(0, 0, 0);
        pub const WHITE: Rgb = Rgb::new(255, 255, 255);

        /// Create a color from its channels.
        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }

        /// Read the RGB channels of a packed 32-bit pixel.
        #[inline]
        pub fn from_pixel(pixel: u32) -> Self {
            let (r, g, b) = extract_rgb(pixel);
            Self { r, g, b }
        }

        /// Pack into a 32-bit pixel with alpha = 255.
        #[inline]
        pub fn to_pixel(self) -> u32 {
            compose_rgb(self.r, self.g, self.b)
        }

        /// Channels as an array in R, G, B order.
        #[inline]
        pub fn channels(self) -> [u8; 3] {
            [self.r, self.g, self.b]
        }
    }

    impl From<(u8, u8, u8)> for Rgb {
        fn from((r, g, b): (u8, u8, u8)) -> Self {
            Self { r, g, b }
        }
    }

    impl fmt::Display for Rgb {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{},{},{}", self.r, self.g, self.b)
        }
    }

}
