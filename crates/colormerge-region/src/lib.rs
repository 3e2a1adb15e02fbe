//! colormerge-region - Greedy region-merging color segmentation
//!
//! This crate reduces an image to a fixed number of regions by repeatedly
//! merging the most similar pair of adjacent regions:
//!
//! - **Pixel grid** - Pixel ids and 4/8-way adjacency
//! - **Partition** - Union-find over pixel ids with exact membership
//! - **Similarity** - Squared-error merge cost from cached color totals
//! - **Candidate queue** - Totally ordered min-queue of proposed merges
//! - **Segmentation** - The merge loop with stale-entry handling
//! - **Materialization** - Region statistics and recoloring
//!
//! # Example
//!
//! ```
//! use colormerge_core::{PixMut, Rgb};
//! use colormerge_region::{SegmentOptions, recolored, segment};
//!
//! let mut pm = PixMut::new(3, 1).unwrap();
//! pm.set_rgb(1, 0, 255, 255, 255).unwrap();
//! let pix = pm.into();
//!
//! let seg = segment(&pix, &SegmentOptions::new(2)).unwrap();
//! let (out, regions) = recolored(&pix, &seg).unwrap();
//!
//! assert_eq!(regions.len(), 2);
//! assert_eq!(regions[0].to_string(), "region 1 size= 2 color=127,127,127");
//! assert_eq!(out.get_rgb(0, 0), Some((127, 127, 127)));
//! ```

pub mod error;
pub mod grid;
pub mod materialize;
pub mod partition;
pub mod progress;
pub mod queue;
pub mod segment;
pub mod similarity;

// Re-export core types
pub use colormerge_core;

pub use error::{RegionError, RegionResult};
pub use grid::{ConnectivityType, PixelGrid};
pub use materialize::{RegionSummary, recolor, recolored, region_summaries, write_summaries};
pub use partition::Partition;
pub use progress::{NoProgress, Progress, ProgressBar, ProgressObserver};
pub use queue::{Candidate, CandidateQueue};
pub use segment::{
    MergeKind, MergeRecord, SegmentOptions, Segmentation, segment, segment_with_progress,
};
pub use similarity::{ColorStats, combined_average, distance};
