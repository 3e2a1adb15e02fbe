//! PNM (Portable Any Map) format support
//!
//! Reads PGM (P2 ASCII / P5 binary) and PPM (P3 ASCII / P6 binary),
//! including `#` comments in the header and any maxval up to 65535.
//! Samples are rescaled to 8 bits; gray is replicated into R, G and B.
//! Writes binary PPM (P6).

use crate::{IoError, IoResult};
use colormerge_core::{ImageFormat, Pix, PixMut, color};
use std::io::{Read, Write};

/// Header-level description of a PNM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PnmHeader {
    width: u32,
    height: u32,
    maxval: u32,
    channels: usize,
    binary: bool,
}

/// Byte cursor over a fully buffered PNM stream.
struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Skip whitespace and `#` comments running to end of line.
    fn skip_separators(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b'#' => {
                    while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn next_u32(&mut self, what: &str) -> IoResult<u32> {
        self.skip_separators();
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData(format!("PNM: expected {what}")));
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IoError::InvalidData(format!("PNM: {what} out of range")))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> IoResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| IoError::InvalidData("PNM: truncated pixel data".to_string()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }
}

fn read_header(scanner: &mut Scanner<'_>) -> IoResult<PnmHeader> {
    let magic = scanner.take(2)?;
    let (channels, binary) = match magic {
        b"P2" => (1, false),
        b"P3" => (3, false),
        b"P5" => (1, true),
        b"P6" => (3, true),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {:?}",
                String::from_utf8_lossy(magic)
            )));
        }
    };

    let width = scanner.next_u32("width")?;
    let height = scanner.next_u32("height")?;
    let maxval = scanner.next_u32("maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("PNM: invalid maxval {maxval}")));
    }

    if binary {
        // Exactly one whitespace byte separates the header from the raster
        let sep = scanner.take(1)?;
        if !sep[0].is_ascii_whitespace() {
            return Err(IoError::InvalidData(
                "PNM: missing separator after header".to_string(),
            ));
        }
    }

    Ok(PnmHeader {
        width,
        height,
        maxval,
        channels,
        binary,
    })
}

/// Rescale a sample in `0..=maxval` to `0..=255`, rounding to nearest.
#[inline]
fn scale_sample(value: u32, maxval: u32) -> IoResult<u8> {
    if value > maxval {
        return Err(IoError::InvalidData(format!(
            "PNM: sample {value} exceeds maxval {maxval}"
        )));
    }
    if maxval == 255 {
        return Ok(value as u8);
    }
    Ok(((value * 255 + maxval / 2) / maxval) as u8)
}

impl PnmHeader {
    /// Smallest raster size in bytes the header can be followed by.
    ///
    /// Exact for binary variants; ASCII needs at least one digit per sample.
    fn min_payload(&self) -> Option<usize> {
        let samples = (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels)?;
        if self.binary && self.maxval > 255 {
            samples.checked_mul(2)
        } else {
            Some(samples)
        }
    }
}

fn read_sample(scanner: &mut Scanner<'_>, header: &PnmHeader) -> IoResult<u8> {
    let raw = if !header.binary {
        scanner.next_u32("sample")?
    } else if header.maxval > 255 {
        let b = scanner.take(2)?;
        (u32::from(b[0]) << 8) | u32::from(b[1])
    } else {
        u32::from(scanner.take(1)?[0])
    };
    scale_sample(raw, header.maxval)
}

/// Read a PNM image (P2/P3/P5/P6) from a reader.
///
/// # Arguments
///
/// * `reader` - Source of the whole PNM stream; it is read to the end
///
/// # Returns
///
/// The decoded 32-bit RGB image with its input format set to
/// [`ImageFormat::Pnm`]. A header announcing more pixels than the stream
/// holds is rejected with [`IoError::InvalidData`] before any allocation.
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut scanner = Scanner::new(&bytes);
    let header = read_header(&mut scanner)?;
    match header.min_payload() {
        Some(needed) if needed <= scanner.remaining() => {}
        _ => {
            return Err(IoError::InvalidData(format!(
                "PNM: {}x{} header exceeds the {} bytes of pixel data",
                header.width,
                header.height,
                scanner.remaining()
            )));
        }
    }

    let mut pix_mut = PixMut::new(header.width, header.height)?;
    pix_mut.set_informat(ImageFormat::Pnm);

    for y in 0..header.height {
        for x in 0..header.width {
            let pixel = if header.channels == 1 {
                let g = read_sample(&mut scanner, &header)?;
                color::compose_rgb(g, g, g)
            } else {
                let r = read_sample(&mut scanner, &header)?;
                let g = read_sample(&mut scanner, &header)?;
                let b = read_sample(&mut scanner, &header)?;
                color::compose_rgb(r, g, b)
            };
            pix_mut.set_pixel_unchecked(x, y, pixel);
        }
    }

    Ok(pix_mut.into())
}

/// Write a `Pix` as binary PPM (P6) to a writer.
///
/// # Arguments
///
/// * `pix` - Image to encode; alpha is dropped
/// * `writer` - Destination, flushed on success
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", pix.width(), pix.height())?;

    let mut row = Vec::with_capacity(pix.width() as usize * 3);
    for y in 0..pix.height() {
        row.clear();
        for &pixel in pix.row_data(y) {
            let (r, g, b) = color::extract_rgb(pixel);
            row.extend_from_slice(&[r, g, b]);
        }
        writer.write_all(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pnm_roundtrip_p6() {
        let mut pm = PixMut::new(3, 2).unwrap();
        pm.set_rgb(0, 0, 1, 2, 3).unwrap();
        pm.set_rgb(2, 1, 250, 128, 7).unwrap();
        let pix: Pix = pm.into();

        let mut buffer = Vec::new();
        write_pnm(&pix, &mut buffer).unwrap();
        assert!(buffer.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(buffer.len(), b"P6\n3 2\n255\n".len() + 3 * 2 * 3);

        let back = read_pnm(buffer.as_slice()).unwrap();
        assert_eq!(back.informat(), ImageFormat::Pnm);
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_read_ascii_ppm_with_comments() {
        let text = b"P3\n# a comment\n2 1 # trailing\n255\n255 0 0   0 0 255\n";
        let pix = read_pnm(&text[..]).unwrap();
        assert_eq!((pix.width(), pix.height()), (2, 1));
        assert_eq!(pix.get_rgb(0, 0), Some((255, 0, 0)));
        assert_eq!(pix.get_rgb(1, 0), Some((0, 0, 255)));
    }

    #[test]
    fn test_read_pgm_replicates_gray() {
        let pix = read_pnm(&b"P5\n2 1\n255\n\x10\xf0"[..]).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some((0x10, 0x10, 0x10)));
        assert_eq!(pix.get_rgb(1, 0), Some((0xf0, 0xf0, 0xf0)));
    }

    #[test]
    fn test_maxval_rescaling() {
        let pix = read_pnm(&b"P2\n3 1\n15\n0 15 8\n"[..]).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some((0, 0, 0)));
        assert_eq!(pix.get_rgb(1, 0), Some((255, 255, 255)));
        // 8 * 255 / 15 = 136
        assert_eq!(pix.get_rgb(2, 0), Some((136, 136, 136)));

        let wide = read_pnm(&b"P5\n1 1\n65535\n\xff\xff"[..]).unwrap();
        assert_eq!(wide.get_rgb(0, 0), Some((255, 255, 255)));
    }

    #[test]
    fn test_truncated_data() {
        let result = read_pnm(&b"P6\n2 2\n255\n\x00\x00\x00"[..]);
        assert!(matches!(result, Err(IoError::InvalidData(_))));
    }

    #[test]
    fn test_huge_header_rejected_before_allocation() {
        let result = read_pnm(&b"P6\n4294967295 4294967295\n255\n\x00\x00\x00"[..]);
        assert!(matches!(result, Err(IoError::InvalidData(_))));

        let ascii = read_pnm(&b"P2\n100000 100000\n255\n0 0 0\n"[..]);
        assert!(matches!(ascii, Err(IoError::InvalidData(_))));

        // 16-bit samples need two bytes each
        let wide = read_pnm(&b"P5\n2 1\n65535\n\xff\xff"[..]);
        assert!(matches!(wide, Err(IoError::InvalidData(_))));
    }

    #[test]
    fn test_sample_above_maxval() {
        let result = read_pnm(&b"P2\n1 1\n10\n11\n"[..]);
        assert!(matches!(result, Err(IoError::InvalidData(_))));
    }

    #[test]
    fn test_unsupported_variant() {
        let result = read_pnm(&b"P4\n8 1\n\x00"[..]);
        assert!(matches!(result, Err(IoError::UnsupportedFormat(_))));
    }
}
