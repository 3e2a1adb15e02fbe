//! PIX - The raster container
//!
//! `Pix` holds a 32-bit RGB(A) image, one packed word per pixel.
//!
//! # Pixel layout
//!
//! - Pixels are stored row-major, `width` words per row
//! - Color order is RGBA (red in MSB), see [`crate::color`]
//! - `spp` is 3 for RGB and 4 when the alpha channel is meaningful
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for efficient cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// PNG format
    Png,
    /// PNM format (PPM / PGM)
    Pnm,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Png => "png",
            Self::Pnm => "pnm",
        }
    }

    /// Guess the format from a file extension (case-insensitive).
    ///
    /// Returns [`ImageFormat::Unknown`] when the extension is missing
    /// or not recognized.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Self::Png,
            Some("pnm" | "ppm" | "pgm") => Self::Pnm,
            _ => Self::Unknown,
        }
    }
}

/// Largest pixel count whose buffer fits in an allocation.
const MAX_PIXELS: usize = isize::MAX as usize / std::mem::size_of::<u32>();

/// Internal PIX data
#[derive(Debug, Clone)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Samples per pixel (3 for RGB, 4 for RGBA)
    spp: u32,
    /// Input file format
    informat: ImageFormat,
    /// The image data, one packed `0xRRGGBBAA` word per pixel
    data: Vec<u32>,
}

impl PixData {
    fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&len| len <= MAX_PIXELS)
            .ok_or(Error::InvalidDimension { width, height })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::InvalidDimension { width, height })?;
        data.resize(len, 0u32);

        Ok(Self {
            width,
            height,
            spp: 3,
            informat: ImageFormat::Unknown,
            data,
        })
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

/// PIX - Main image container
///
/// # Examples
///
/// ```
/// use colormerge_core::Pix;
///
/// let pix = Pix::new(640, 480).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// assert_eq!(pix.pixel_count(), 640 * 480);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new RGB image with the specified dimensions.
    ///
    /// The image data is initialized to zero (transparent black).
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels, at least 1
    /// * `height` - Height in pixels, at least 1
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or if
    /// the pixel buffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Pix {
            inner: Arc::new(PixData::new(width, height)?),
        })
    }

    /// Create an image filled with a single packed pixel value.
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels, at least 1
    /// * `height` - Height in pixels, at least 1
    /// * `pixel` - Packed `0xRRGGBBAA` value for every pixel
    pub fn new_filled(width: u32, height: u32, pixel: u32) -> Result<Self> {
        let mut data = PixData::new(width, height)?;
        data.data.fill(pixel);
        Ok(Pix {
            inner: Arc::new(data),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Total number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.data.len()
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the pixels of a single row.
    ///
    /// # Arguments
    ///
    /// * `y` - Row index
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Check if two PIX have the same width and height.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    ///
    /// # Returns
    ///
    /// The mutable image, or `self` unchanged when the data is shared.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this PIX.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: self.inner.as_ref().clone(),
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Create a new zeroed mutable image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(PixMut {
            inner: PixData::new(width, height)?,
        })
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Set samples per pixel.
    ///
    /// # Arguments
    ///
    /// * `spp` - 3 for RGB, 4 when the alpha channel is meaningful
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `spp` is 3 or 4.
    pub fn set_spp(&mut self, spp: u32) -> Result<()> {
        if spp != 3 && spp != 4 {
            return Err(Error::InvalidParameter(format!(
                "samples per pixel must be 3 or 4; got {spp}"
            )));
        }
        self.inner.spp = spp;
        Ok(())
    }

    /// Set the input format.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}
