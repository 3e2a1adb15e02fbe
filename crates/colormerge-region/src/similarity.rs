//! Merge cost between two regions
//!
//! The cost of merging A and B is the summed squared RGB error of all
//! their pixels against the size-weighted combined average color, where
//! each region's own average is floor-divided first. Expanding the square
//!
//! ```text
//! sum (x - c)^2 = sum x^2 - 2c * sum x + n * c^2
//! ```
//!
//! lets [`ColorStats`] answer this from per-channel sums and sums of
//! squares in constant time, with the same result as a full rescan.

use colormerge_core::{Rgb, color};

/// Running per-channel totals for one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorStats {
    count: u64,
    sum: [u64; 3],
    sum_sq: [u64; 3],
}

impl ColorStats {
    /// Totals of a single pixel word; alpha is ignored.
    pub fn from_pixel(pixel: u32) -> Self {
        let (r, g, b) = color::extract_rgb(pixel);
        let channels = [u64::from(r), u64::from(g), u64::from(b)];
        Self {
            count: 1,
            sum: channels,
            sum_sq: channels.map(|c| c * c),
        }
    }

    /// Totals over a set of pixel words.
    pub fn from_pixels<I: IntoIterator<Item = u32>>(pixels: I) -> Self {
        pixels
            .into_iter()
            .fold(Self::default(), |mut acc, pixel| {
                acc.merge(&Self::from_pixel(pixel));
                acc
            })
    }

    /// Fold another region's totals into these.
    pub fn merge(&mut self, other: &ColorStats) {
        self.count += other.count;
        for c in 0..3 {
            self.sum[c] += other.sum[c];
            self.sum_sq[c] += other.sum_sq[c];
        }
    }

    /// Number of pixels.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn average_channels(&self) -> [u64; 3] {
        if self.count == 0 {
            return [0; 3];
        }
        self.sum.map(|s| s / self.count)
    }

    /// Floor-divided average color; black for an empty set.
    pub fn average(&self) -> Rgb {
        let [r, g, b] = self.average_channels();
        Rgb::new(r as u8, g as u8, b as u8)
    }
}

/// Size-weighted combination of the two regions' averages, floor-divided.
pub fn combined_average(a: &ColorStats, b: &ColorStats) -> Rgb {
    let [r, g, b] = combined_channels(a, b);
    Rgb::new(r as u8, g as u8, b as u8)
}

fn combined_channels(a: &ColorStats, b: &ColorStats) -> [u64; 3] {
    let n = a.count + b.count;
    if n == 0 {
        return [0; 3];
    }
    let avg_a = a.average_channels();
    let avg_b = b.average_channels();
    [0usize, 1, 2].map(|c| (avg_a[c] * a.count + avg_b[c] * b.count) / n)
}

/// Squared error of every pixel of `a` and `b` against their combined
/// average color.
///
/// # Arguments
///
/// * `a`, `b` - Totals of the two regions being compared; order does not matter
///
/// # Returns
///
/// The sum over all pixels and RGB channels of `(value - average)^2`, where
/// the average is [`combined_average`]. Zero means every pixel already has
/// that color.
pub fn distance(a: &ColorStats, b: &ColorStats) -> u64 {
    let n = a.count + b.count;
    let combined = combined_channels(a, b);
    (0..3)
        .map(|c| {
            let center = combined[c];
            let sum = a.sum[c] + b.sum[c];
            let sum_sq = a.sum_sq[c] + b.sum_sq[c];
            // sum_sq + n*c^2 >= 2c*sum always holds, the difference being
            // a sum of squares
            sum_sq + n * center * center - 2 * center * sum
        })
        .sum()
}
