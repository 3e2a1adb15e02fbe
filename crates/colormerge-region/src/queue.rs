//! Min-priority queue of proposed merges
//!
//! Entries are ordered by distance, then by first pixel id, then by
//! second pixel id, so equal distances still pop in a fixed order.
//! There is no decrease-key: outdated entries stay in the queue and are
//! re-validated when popped.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A proposed merge between the regions containing pixels `a` and `b`,
/// with the distance measured when it was queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub distance: u64,
    pub a: usize,
    pub b: usize,
}

impl Candidate {
    pub fn new(distance: u64, a: usize, b: usize) -> Self {
        Self { distance, a, b }
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Candidates, smallest first.
#[derive(Debug, Clone, Default)]
pub struct CandidateQueue {
    heap: BinaryHeap<Reverse<Candidate>>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.heap.push(Reverse(candidate));
    }

    /// Remove and return the smallest candidate.
    pub fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop().map(|Reverse(c)| c)
    }

    pub fn peek(&self) -> Option<&Candidate> {
        self.heap.peek().map(|Reverse(c)| c)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<Candidate> for CandidateQueue {
    fn extend<I: IntoIterator<Item = Candidate>>(&mut self, iter: I) {
        self.heap.extend(iter.into_iter().map(Reverse));
    }
}
