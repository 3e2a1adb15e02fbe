//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.

use super::{Pix, PixMut};
use crate::color;
use crate::error::{Error, Result};

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// # Arguments
    ///
    /// * `x` - Column, `0..width`
    /// * `y` - Row, `0..height`
    ///
    /// # Returns
    ///
    /// The packed `0xRRGGBBAA` word, or `None` if coordinates are out of
    /// bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner.index(x, y).map(|i| self.inner.data[i])
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

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner.index(x, y).map(|i| self.inner.data[i])
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Arguments
    ///
    /// * `x` - Column, `0..width`
    /// * `y` - Row, `0..height`
    /// * `val` - Packed `0xRRGGBBAA` word
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        let index = self.inner.index(x, y).ok_or(Error::IndexOutOfBounds {
            index: y as usize * self.inner.width as usize + x as usize,
            len: self.inner.data.len(),
        })?;
        self.inner.data[index] = val;
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y * width + x` is past the end of the data.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let index = y as usize * self.inner.width as usize + x as usize;
        self.inner.data[index] = val;
    }

    /// Set an RGB pixel at (x, y) with alpha = 255.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }

    /// Set an RGBA pixel at (x, y).
    pub fn set_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        self.set_pixel(x, y, color::compose_rgba(r, g, b, a))
    }
}
