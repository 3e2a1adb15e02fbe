//! PNG image format support
//!
//! Every PNG color type is normalized to 8-bit RGB(A) on read: palettes
//! and sub-byte grays are expanded, 16-bit samples are stripped to their
//! high byte and grayscale is replicated into all three channels.

use crate::{IoError, IoResult};
use colormerge_core::{ImageFormat, Pix, PixMut, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Every color type and bit depth is normalized to 8-bit RGB; images with
/// an alpha channel or `tRNS` chunk keep alpha and report `spp == 4`.
///
/// # Arguments
///
/// * `reader` - Buffered, seekable source positioned at the PNG signature
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG format after expansion: {:?} {:?}",
            color_type, bit_depth
        )));
    }

    let (samples, spp) = match color_type {
        ColorType::Grayscale => (1usize, 3),
        ColorType::GrayscaleAlpha => (2, 4),
        ColorType::Rgb => (3, 3),
        ColorType::Rgba => (4, 4),
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };

    // Read image data
    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let mut pix_mut = PixMut::new(width, height)?;
    pix_mut.set_spp(spp)?;
    pix_mut.set_informat(ImageFormat::Png);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        for x in 0..width {
            let idx = row_start + x as usize * samples;
            let pixel = match color_type {
                ColorType::Grayscale => {
                    let g = data[idx];
                    color::compose_rgb(g, g, g)
                }
                ColorType::GrayscaleAlpha => {
                    let g = data[idx];
                    color::compose_rgba(g, g, g, data[idx + 1])
                }
                ColorType::Rgb => color::compose_rgb(data[idx], data[idx + 1], data[idx + 2]),
                _ => color::compose_rgba(data[idx], data[idx + 1], data[idx + 2], data[idx + 3]),
            };
            pix_mut.set_pixel_unchecked(x, y, pixel);
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image
///
/// Writes 8-bit RGB, or RGBA when the image carries alpha (`spp == 4`).
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, samples) = if pix.spp() == 4 {
        (ColorType::Rgba, 4usize)
    } else {
        (ColorType::Rgb, 3usize)
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let bytes_per_row = width as usize * samples;
    let mut data = vec![0u8; bytes_per_row * height as usize];

    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        for (x, &pixel) in pix.row_data(y).iter().enumerate() {
            let idx = row_start + x * samples;
            let (r, g, b, a) = color::extract_rgba(pixel);
            data[idx] = r;
            data[idx + 1] = g;
            data[idx + 2] = b;
            if samples == 4 {
                data[idx + 3] = a;
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_rgb() {
        let mut pix_mut = PixMut::new(5, 5).unwrap();
        pix_mut.set_rgb(0, 0, 255, 0, 0).unwrap();
        pix_mut.set_rgb(1, 1, 0, 255, 0).unwrap();
        pix_mut.set_rgb(2, 2, 0, 0, 255).unwrap();
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();

        let pix2 = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix2.width(), 5);
        assert_eq!(pix2.height(), 5);
        assert_eq!(pix2.spp(), 3);
        assert_eq!(pix2.informat(), ImageFormat::Png);
        assert_eq!(pix2.get_rgb(0, 0), Some((255, 0, 0)));
        assert_eq!(pix2.get_rgb(1, 1), Some((0, 255, 0)));
        assert_eq!(pix2.get_rgb(2, 2), Some((0, 0, 255)));
        assert_eq!(pix2.get_rgb(4, 4), Some((0, 0, 0)));
    }

    #[test]
    fn test_png_roundtrip_rgba_keeps_alpha() {
        let mut pix_mut = PixMut::new(2, 1).unwrap();
        pix_mut.set_spp(4).unwrap();
        pix_mut.set_rgba(0, 0, 10, 20, 30, 40).unwrap();
        pix_mut.set_rgba(1, 0, 50, 60, 70, 255).unwrap();
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();
        let pix2 = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(pix2.spp(), 4);
        assert_eq!(pix2.get_rgba(0, 0), Some((10, 20, 30, 40)));
        assert_eq!(pix2.get_rgba(1, 0), Some((50, 60, 70, 255)));
    }

    #[test]
    fn test_png_grayscale_expands_to_rgb() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 3, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 128, 255]).unwrap();
        }

        let pix = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix.spp(), 3);
        assert_eq!(pix.get_rgb(0, 0), Some((0, 0, 0)));
        assert_eq!(pix.get_rgb(1, 0), Some((128, 128, 128)));
        assert_eq!(pix.get_rgb(2, 0), Some((255, 255, 255)));
    }

    #[test]
    fn test_png_palette_expands_to_rgb() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 2, 1);
            encoder.set_color(ColorType::Indexed);
            encoder.set_depth(BitDepth::Eight);
            encoder.set_palette(vec![1, 2, 3, 200, 150, 100]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 0]).unwrap();
        }

        let pix = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some((200, 150, 100)));
        assert_eq!(pix.get_rgb(1, 0), Some((1, 2, 3)));
    }

    #[test]
    fn test_png_garbage_is_decode_error() {
        let result = read_png(Cursor::new(b"not a png at all".to_vec()));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}
