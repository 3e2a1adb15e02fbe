//! Greedy region-merging segmentation
//!
//! Starts from one region per pixel and repeatedly merges the adjacent
//! pair with the smallest [`distance`](crate::similarity::distance) until
//! the requested number of regions is left.
//!
//! # Staleness
//!
//! Queue entries record the distance seen when they were pushed. On pop:
//!
//! - both pixels already in one region: the entry is dropped
//! - either pixel absorbed since then: a zero distance is committed as is,
//!   a positive one is recomputed between the current roots and requeued
//! - both pixels still roots: the distance is recomputed, and the merge
//!   commits only if it is unchanged. Otherwise the entry is dropped.
//!
//! After a positive-distance merge every region adjacent to the result gets
//! a fresh entry against it.

use std::collections::BTreeSet;

use colormerge_core::{Pix, Rgb};

use crate::error::{RegionError, RegionResult};
use crate::grid::{ConnectivityType, PixelGrid};
use crate::partition::Partition;
use crate::progress::{NoProgress, Progress, ProgressObserver};
use crate::queue::{Candidate, CandidateQueue};
use crate::similarity::{ColorStats, distance};

/// Options for [`segment`]
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Number of regions to stop at (at least 2)
    pub target_regions: u32,
    /// Neighbourhood defining adjacent regions
    pub connectivity: ConnectivityType,
    /// Loop iterations between progress reports, 0 for none
    pub progress_interval: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            target_regions: 2,
            connectivity: ConnectivityType::EightWay,
            progress_interval: 500,
        }
    }
}

impl SegmentOptions {
    /// Options stopping at `target_regions` regions
    pub fn new(target_regions: u32) -> Self {
        Self::default().with_target_regions(target_regions)
    }

    /// Set the number of regions to stop at
    pub fn with_target_regions(mut self, target_regions: u32) -> Self {
        self.target_regions = target_regions;
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the number of iterations between progress reports
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Check the options before any work is done.
    ///
    /// # Errors
    ///
    /// [`RegionError::InvalidTarget`] if fewer than 2 regions are requested.
    pub fn validate(&self) -> RegionResult<()> {
        if self.target_regions < 2 {
            return Err(RegionError::InvalidTarget {
                target: self.target_regions,
            });
        }
        Ok(())
    }
}

/// How a merge was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// Both pixels were roots and the recomputed distance matched
    Verified,
    /// A zero-distance entry whose pixels had been absorbed meanwhile
    ZeroDistance,
}

/// One committed merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    pub survivor: usize,
    pub absorbed: usize,
    pub distance: u64,
    pub kind: MergeKind,
}

/// Terminal state of a segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    grid: PixelGrid,
    connectivity: ConnectivityType,
    partition: Partition,
    stats: Vec<ColorStats>,
    history: Vec<MergeRecord>,
    iterations: usize,
    reseeds: usize,
}

impl Segmentation {
    fn new(pix: &Pix, connectivity: ConnectivityType) -> Self {
        let grid = PixelGrid::from_pix(pix);
        Self {
            grid,
            connectivity,
            partition: Partition::new(grid.len()),
            stats: pix.data().iter().map(|&p| ColorStats::from_pixel(p)).collect(),
            history: Vec::new(),
            iterations: 0,
            reseeds: 0,
        }
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn connectivity(&self) -> ConnectivityType {
        self.connectivity
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Number of live regions.
    pub fn region_count(&self) -> usize {
        self.partition.live_region_count()
    }

    /// Root of the region containing pixel `id`.
    pub fn region_of(&self, id: usize) -> RegionResult<usize> {
        self.partition.root_of(id)
    }

    /// Color totals of the region rooted at `root`.
    pub fn stats(&self, root: usize) -> RegionResult<ColorStats> {
        self.partition.size(root)?;
        Ok(self.stats[root])
    }

    /// Floor-divided average color of the region rooted at `root`.
    pub fn average_color(&self, root: usize) -> RegionResult<Rgb> {
        Ok(self.stats(root)?.average())
    }

    /// Committed merges, oldest first.
    pub fn history(&self) -> &[MergeRecord] {
        &self.history
    }

    /// Queue entries popped by the merge loop.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Times the queue ran dry and was rebuilt from the current adjacency.
    pub fn reseeds(&self) -> usize {
        self.reseeds
    }

    fn candidate(&self, a: usize, b: usize) -> Candidate {
        Candidate::new(distance(&self.stats[a], &self.stats[b]), a, b)
    }

    /// One entry per adjacent pixel pair, in both orders.
    fn seed(&self, queue: &mut CandidateQueue) {
        for id in 0..self.grid.len() {
            for neighbor in self.grid.neighbors(id, self.connectivity) {
                queue.push(self.candidate(id, neighbor));
            }
        }
    }

    /// Queue every currently adjacent pair of distinct roots.
    fn reseed(&mut self, queue: &mut CandidateQueue) -> RegionResult<usize> {
        let mut pairs = BTreeSet::new();
        for id in 0..self.grid.len() {
            let root = self.partition.root_of(id)?;
            for neighbor in self.grid.neighbors(id, self.connectivity) {
                let other = self.partition.root_of(neighbor)?;
                if other != root {
                    pairs.insert((root, other));
                }
            }
        }
        queue.extend(pairs.iter().map(|&(a, b)| self.candidate(a, b)));
        self.reseeds += 1;
        Ok(pairs.len())
    }

    fn merge(
        &mut self,
        root1: usize,
        root2: usize,
        distance: u64,
        kind: MergeKind,
    ) -> RegionResult<usize> {
        let survivor = self.partition.union(root1, root2)?;
        let absorbed = if survivor == root1 { root2 } else { root1 };
        let absorbed_stats = self.stats[absorbed];
        self.stats[survivor].merge(&absorbed_stats);

        tracing::trace!(survivor, absorbed, distance, ?kind, "merged regions");
        self.history.push(MergeRecord {
            survivor,
            absorbed,
            distance,
            kind,
        });
        Ok(survivor)
    }

    /// Queue a fresh entry between `root` and each distinct adjacent region.
    fn expand_frontier(&self, root: usize, queue: &mut CandidateQueue) -> RegionResult<()> {
        let mut neighbors = BTreeSet::new();
        for &member in self.partition.members(root)? {
            for neighbor in self.grid.neighbors(member, self.connectivity) {
                let other = self.partition.root_of(neighbor)?;
                if other != root {
                    neighbors.insert(other);
                }
            }
        }
        queue.extend(neighbors.into_iter().map(|other| self.candidate(root, other)));
        Ok(())
    }

    /// Handle one popped entry.
    fn step(&mut self, entry: Candidate, queue: &mut CandidateQueue) -> RegionResult<()> {
        let Candidate { distance: d, a, b } = entry;
        let root_a = self.partition.find(a)?;
        let root_b = self.partition.find(b)?;

        if root_a == root_b {
            return Ok(());
        }

        if root_a != a || root_b != b {
            if d == 0 {
                self.merge(root_a, root_b, 0, MergeKind::ZeroDistance)?;
            } else {
                queue.push(self.candidate(root_a, root_b));
            }
            return Ok(());
        }

        if self.candidate(a, b).distance != d {
            return Ok(());
        }

        let survivor = self.merge(a, b, d, MergeKind::Verified)?;
        if d > 0 {
            self.expand_frontier(survivor, queue)?;
        }
        Ok(())
    }
}

/// Segment `pix` into `options.target_regions` regions.
///
/// Images with no more pixels than the target are returned unmerged.
///
/// # Errors
///
/// [`RegionError::InvalidTarget`] if fewer than 2 regions are requested.
pub fn segment(pix: &Pix, options: &SegmentOptions) -> RegionResult<Segmentation> {
    segment_with_progress(pix, options, &mut NoProgress)
}

/// [`segment`], reporting to `observer` every `options.progress_interval`
/// loop iterations.
///
/// # Arguments
///
/// * `pix` - Image to segment; alpha is ignored
/// * `options` - Target region count, connectivity and progress interval
/// * `observer` - Receives [`Progress`] snapshots; use [`NoProgress`] to skip them
///
/// # Returns
///
/// The final [`Segmentation`] with `min(target, pixel count)` live regions
/// and the full merge history.
pub fn segment_with_progress(
    pix: &Pix,
    options: &SegmentOptions,
    observer: &mut dyn ProgressObserver,
) -> RegionResult<Segmentation> {
    options.validate()?;
    let target = options.target_regions as usize;

    let mut seg = Segmentation::new(pix, options.connectivity);
    let mut queue = CandidateQueue::with_capacity(
        seg.grid.len() * options.connectivity.neighbor_count(),
    );
    seg.seed(&mut queue);
    tracing::debug!(
        width = pix.width(),
        height = pix.height(),
        target,
        candidates = queue.len(),
        "starting segmentation"
    );

    while seg.region_count() > target {
        let Some(entry) = queue.pop() else {
            let pairs = seg.reseed(&mut queue)?;
            tracing::warn!(
                regions = seg.region_count(),
                target,
                pairs,
                "candidate queue exhausted, reseeding from current adjacency"
            );
            if pairs == 0 {
                break;
            }
            continue;
        };

        seg.iterations += 1;
        if options.progress_interval > 0 && seg.iterations % options.progress_interval == 0 {
            observer.report(Progress {
                target,
                remaining: seg.region_count(),
            });
        }

        seg.step(entry, &mut queue)?;
    }
    observer.finish();

    tracing::debug!(
        regions = seg.region_count(),
        merges = seg.history.len(),
        iterations = seg.iterations,
        reseeds = seg.reseeds,
        leftover = queue.len(),
        "segmentation finished"
    );
    Ok(seg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colormerge_core::{PixMut, color};

    fn row(colors: &[(u8, u8, u8)]) -> Pix {
        let mut pm = PixMut::new(colors.len() as u32, 1).unwrap();
        for (x, &(r, g, b)) in colors.iter().enumerate() {
            pm.set_rgb(x as u32, 0, r, g, b).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_options() {
        let opts = SegmentOptions::new(8)
            .with_connectivity(ConnectivityType::FourWay)
            .with_progress_interval(0);
        assert_eq!(opts.target_regions, 8);
        assert_eq!(opts.connectivity, ConnectivityType::FourWay);
        assert_eq!(opts.progress_interval, 0);

        let defaults = SegmentOptions::default();
        assert_eq!(defaults.target_regions, 2);
        assert_eq!(defaults.connectivity, ConnectivityType::EightWay);
        assert_eq!(defaults.progress_interval, 500);
    }

    #[test]
    fn test_target_below_two_rejected() {
        let pix = Pix::new(2, 2).unwrap();
        for k in [0, 1] {
            assert!(matches!(
                segment(&pix, &SegmentOptions::new(k)),
                Err(RegionError::InvalidTarget { target }) if target == k
            ));
        }
        assert_eq!(segment(&pix, &SegmentOptions::new(2)).unwrap().region_count(), 2);
    }

    #[test]
    fn test_black_white_black_row() {
        let pix = row(&[(0, 0, 0), (255, 255, 255), (0, 0, 0)]);
        let seg = segment(&pix, &SegmentOptions::new(2)).unwrap();

        assert_eq!(seg.region_count(), 2);
        assert_eq!(
            seg.history(),
            &[MergeRecord {
                survivor: 1,
                absorbed: 0,
                distance: 97_539,
                kind: MergeKind::Verified,
            }]
        );
        assert_eq!(seg.region_of(0).unwrap(), 1);
        assert_eq!(seg.region_of(2).unwrap(), 2);
        assert_eq!(seg.average_color(1).unwrap(), Rgb::new(127, 127, 127));
        assert_eq!(seg.average_color(2).unwrap(), Rgb::BLACK);
        assert!(matches!(
            seg.average_color(0),
            Err(RegionError::NotARoot { id: 0 })
        ));
    }

    #[test]
    fn test_solid_block_uses_zero_distance_shortcut() {
        let pix = Pix::new_filled(2, 2, color::compose_rgb(40, 80, 120)).unwrap();
        let seg = segment(&pix, &SegmentOptions::new(2)).unwrap();

        assert_eq!(seg.region_count(), 2);
        let kinds: Vec<MergeKind> = seg.history().iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MergeKind::Verified, MergeKind::ZeroDistance]);
        assert_eq!(seg.partition().size(1).unwrap(), 3);
        assert_eq!(seg.partition().size(3).unwrap(), 1);
        assert!(seg.history().iter().all(|m| m.distance == 0));
    }

    #[test]
    fn test_target_at_least_pixel_count() {
        let pix = row(&[(1, 2, 3), (4, 5, 6), (7, 8, 9)]);
        for k in [3, 4, 100] {
            let seg = segment(&pix, &SegmentOptions::new(k)).unwrap();
            assert_eq!(seg.region_count(), 3);
            assert!(seg.history().is_empty());
            assert_eq!(seg.iterations(), 0);
        }
    }

    #[test]
    fn test_reseed_rebuilds_adjacency() {
        let pix = row(&[(0, 0, 0), (9, 9, 9), (200, 0, 0)]);
        let mut seg = Segmentation::new(&pix, ConnectivityType::EightWay);
        seg.merge(0, 1, 0, MergeKind::Verified).unwrap();

        let mut queue = CandidateQueue::new();
        let pairs = seg.reseed(&mut queue).unwrap();
        // (1, 2) and (2, 1)
        assert_eq!(pairs, 2);
        assert_eq!(seg.reseeds(), 1);
        let first = queue.pop().unwrap();
        assert_eq!((first.a, first.b), (1, 2));
        assert_eq!(first.distance, seg.candidate(1, 2).distance);
    }

    struct Recorder(Vec<Progress>, bool);

    impl ProgressObserver for Recorder {
        fn report(&mut self, progress: Progress) {
            self.0.push(progress);
        }

        fn finish(&mut self) {
            self.1 = true;
        }
    }

    #[test]
    fn test_progress_interval() {
        let pix = Pix::new_filled(4, 4, color::compose_rgb(1, 1, 1)).unwrap();
        let mut recorder = Recorder(Vec::new(), false);
        let opts = SegmentOptions::new(2).with_progress_interval(1);
        let seg = segment_with_progress(&pix, &opts, &mut recorder).unwrap();

        assert_eq!(recorder.0.len(), seg.iterations());
        assert!(recorder.1);
        assert!(recorder.0.iter().all(|p| p.target == 2 && p.remaining > 2));

        let mut silent = Recorder(Vec::new(), false);
        let opts = opts.with_progress_interval(0);
        segment_with_progress(&pix, &opts, &mut silent).unwrap();
        assert!(silent.0.is_empty());
    }
}
