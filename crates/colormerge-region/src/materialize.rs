//! Turning a finished segmentation into output
//!
//! Regions are listed largest first, equal sizes by descending root id,
//! and every member pixel is painted with its region's average color.

use std::fmt;
use std::io::{self, Write};

use colormerge_core::{Error, Pix, PixMut, Rgb, color};

use crate::error::RegionResult;
use crate::segment::Segmentation;

/// Statistics of one output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSummary {
    /// 1-based position in the output order
    pub ordinal: usize,
    /// Root pixel id of the region
    pub root: usize,
    /// Number of pixels
    pub size: usize,
    /// Floor-divided average color
    pub color: Rgb,
}

impl fmt::Display for RegionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "region {} size= {} color={}",
            self.ordinal, self.size, self.color
        )
    }
}

/// Summaries of all live regions in output order.
///
/// # Returns
///
/// One summary per live region, largest first; equal sizes list the higher
/// root id first. Ordinals start at 1.
pub fn region_summaries(seg: &Segmentation) -> RegionResult<Vec<RegionSummary>> {
    let partition = seg.partition();
    let mut regions = partition
        .roots()
        .map(|root| -> RegionResult<(usize, usize)> { Ok((partition.size(root)?, root)) })
        .collect::<RegionResult<Vec<_>>>()?;
    regions.sort_unstable_by(|a, b| b.cmp(a));

    regions
        .into_iter()
        .enumerate()
        .map(|(i, (size, root))| -> RegionResult<RegionSummary> {
            Ok(RegionSummary {
                ordinal: i + 1,
                root,
                size,
                color: seg.average_color(root)?,
            })
        })
        .collect()
}

/// Paint every pixel of `pix` with its region's average color, keeping
/// alpha.
///
/// # Arguments
///
/// * `pix` - Image to repaint in place, normally the one that was segmented
/// * `seg` - Segmentation of an image of the same size
///
/// # Returns
///
/// The region summaries, as from [`region_summaries`].
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if `pix` is not the segmented size.
pub fn recolor(pix: &mut PixMut, seg: &Segmentation) -> RegionResult<Vec<RegionSummary>> {
    let grid = seg.grid();
    if (pix.width(), pix.height()) != (grid.width(), grid.height()) {
        return Err(Error::DimensionMismatch {
            expected: (grid.width(), grid.height()),
            actual: (pix.width(), pix.height()),
        }
        .into());
    }

    let summaries = region_summaries(seg)?;
    let data = pix.data_mut();
    for summary in &summaries {
        for &id in seg.partition().members(summary.root)? {
            data[id] = color::with_rgb(data[id], summary.color);
        }
    }
    Ok(summaries)
}

/// A recolored copy of `pix`.
pub fn recolored(pix: &Pix, seg: &Segmentation) -> RegionResult<(Pix, Vec<RegionSummary>)> {
    let mut pix_mut = pix.to_mut();
    let summaries = recolor(&mut pix_mut, seg)?;
    Ok((pix_mut.into(), summaries))
}

/// Write one `region <i> size= <n> color=<r>,<g>,<b>` line per summary.
pub fn write_summaries<W: Write>(mut writer: W, summaries: &[RegionSummary]) -> io::Result<()> {
    for summary in summaries {
        writeln!(writer, "{summary}")?;
    }
    writer.flush()
}
