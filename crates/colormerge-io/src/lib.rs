//! colormerge-io - Image I/O for colormerge
//!
//! Decodes raster files into 32-bit RGB [`Pix`] images and encodes them
//! back. Only round-trip fidelity of the RGB values is a goal; container
//! metadata is not preserved.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | PNG    | yes  | yes   | `png-format` (default) |
//! | PNM    | P2/P3/P5/P6 | P6 | `pnm` (default) |
//!
//! # Example
//!
//! ```
//! use colormerge_core::{ImageFormat, Pix};
//! use colormerge_io::{read_image_mem, write_image_mem};
//!
//! let pix = Pix::new(4, 4).unwrap();
//! let bytes = write_image_mem(&pix, ImageFormat::Pnm).unwrap();
//! let back = read_image_mem(&bytes).unwrap();
//! assert_eq!(back.width(), 4);
//! ```

pub mod error;
pub mod format;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use colormerge_core::ImageFormat;
pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};

use colormerge_core::Pix;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file path, detecting the format from its header.
///
/// # Arguments
///
/// * `path` - Image file to decode
///
/// # Returns
///
/// The decoded image. Opening failures surface as [`IoError::Io`];
/// unrecognized or malformed content as [`IoError::UnsupportedFormat`] or
/// [`IoError::InvalidData`].
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let file = File::open(path)?;
    let pix = read_image_format(BufReader::new(file), format)?;
    tracing::debug!(
        path = %path.display(),
        ?format,
        width = pix.width(),
        height = pix.height(),
        "read image"
    );
    Ok(pix)
}

/// Read an image from an in-memory buffer.
///
/// # Arguments
///
/// * `data` - Complete encoded image; the format is detected from its magic bytes
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

/// Decode an image of a known format.
pub fn read_image_format<R: std::io::BufRead + std::io::Seek>(
    reader: R,
    format: ImageFormat,
) -> IoResult<Pix> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => crate::png::read_png(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => crate::pnm::read_pnm(reader),
        other => Err(IoError::UnsupportedFormat(format!(
            "reading {:?} is not supported",
            other
        ))),
    }
}

/// Write an image to a file path in the given format.
///
/// # Arguments
///
/// * `pix` - Image to encode
/// * `path` - Destination file, created or truncated
/// * `format` - Output format; [`ImageFormat::Unknown`] falls back to the
///   format implied by the path's extension
///
/// # Returns
///
/// [`IoError::UnsupportedFormat`] without touching the filesystem when no
/// format can be inferred.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let format = match format {
        ImageFormat::Unknown => ImageFormat::from_path(path),
        known => known,
    };
    if format == ImageFormat::Unknown {
        return Err(IoError::UnsupportedFormat(format!(
            "cannot infer an image format from {}",
            path.display()
        )));
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_format(pix, &mut writer, format)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), ?format, "wrote image");
    Ok(())
}

/// Encode an image into an in-memory buffer.
///
/// # Returns
///
/// The encoded bytes, readable again with [`read_image_mem`].
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_image_format(pix, &mut buffer, format)?;
    Ok(buffer)
}

/// Encode an image in a known format.
pub fn write_image_format<W: Write>(pix: &Pix, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => crate::png::write_png(pix, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => crate::pnm::write_pnm(pix, writer),
        other => Err(IoError::UnsupportedFormat(format!(
            "writing {:?} is not supported",
            other
        ))),
    }
}
