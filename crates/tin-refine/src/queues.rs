//! The two work queues the main refinement loop drains (spec.md §4.6
//! `encroachedQueue`/`badTriangleQueue`).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use tin_pool::EdgeId;

/// FIFO of segments suspected of being encroached. Membership is not
/// deduplicated here — a segment can be pushed more than once; the consumer
/// re-checks encroachment on pop and silently drops stale entries.
#[derive(Debug, Default)]
pub struct EncroachedQueue {
    inner: VecDeque<EdgeId>,
}

impl EncroachedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, e: EdgeId) {
        self.inner.push_back(e);
    }

    pub fn pop(&mut self) -> Option<EdgeId> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct BadTriangleEntry {
    edge: EdgeId,
    cross_sq: f64,
}

impl PartialEq for BadTriangleEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cross_sq == other.cross_sq
    }
}
impl Eq for BadTriangleEntry {}

impl PartialOrd for BadTriangleEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BadTriangleEntry {
    /// Larger `cross²` (worse triangle) sorts greater, so `BinaryHeap`'s
    /// max-heap pops the worst triangle first, matching spec.md's
    /// "priority is `×²`".
    fn cmp(&self, other: &Self) -> Ordering {
        self.cross_sq.partial_cmp(&other.cross_sq).unwrap_or(Ordering::Equal)
    }
}

/// Priority queue of candidate bad triangles, keyed by `cross²` with a
/// representative edge of the triangle (spec.md §4.6).
#[derive(Debug, Default)]
pub struct BadTriangleQueue {
    inner: BinaryHeap<BadTriangleEntry>,
}

impl BadTriangleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: EdgeId, cross_sq: f64) {
        self.inner.push(BadTriangleEntry { edge, cross_sq });
    }

    pub fn pop(&mut self) -> Option<EdgeId> {
        self.inner.pop().map(|e| e.edge)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
