//! colormerge - Palette reduction by greedy region merging
//!
//! Every pixel starts as its own region; the most similar pair of
//! adjacent regions is merged until K regions remain, and each region is
//! then painted with its average color.
//!
//! # Overview
//!
//! - [`io`]: PNG and PNM reading and writing
//! - [`region`]: the merge engine and region statistics
//! - core types ([`Pix`], [`PixMut`], [`Rgb`]) re-exported at the top level
//!
//! # Example
//!
//! ```
//! use colormerge::region::{SegmentOptions, recolored, segment};
//! use colormerge::{Pix, color};
//!
//! let pix = Pix::new_filled(4, 4, color::compose_rgb(200, 10, 10)).unwrap();
//! let seg = segment(&pix, &SegmentOptions::new(3)).unwrap();
//! let (out, regions) = recolored(&pix, &seg).unwrap();
//!
//! assert_eq!(regions.len(), 3);
//! assert_eq!(out.data(), pix.data());
//! ```

use std::path::{Path, PathBuf};

// Re-export core types (primary data structures used everywhere)
pub use colormerge_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use colormerge_io as io;
pub use colormerge_region as region;

/// `<input without extension>_seg_<K>.png`, next to the input.
pub fn default_output_path(input: &Path, target: u32) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_seg_{target}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("photos/cat.jpeg.png"), 16),
            PathBuf::from("photos/cat.jpeg_seg_16.png")
        );
        assert_eq!(
            default_output_path(Path::new("plain"), 2),
            PathBuf::from("plain_seg_2.png")
        );
    }
}
