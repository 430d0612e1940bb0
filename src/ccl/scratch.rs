//! Per-worker scratch reused across partitions.

use super::constants::{CellIdx, MAX_CELLS_PER_PARTITION, MAX_NEIGHBORS};

/// Label arrays and adjacency slots for one partition.
///
/// Each worker thread owns one of these and resizes it per partition; the
/// backing allocations are made once at the partition cap and never grow
/// afterwards.
pub(crate) struct PartitionScratch {
    /// Parent label per cell ("father").
    pub(crate) f: Vec<CellIdx>,
    /// Cached grandparent per cell (`f ∘ f`).
    pub(crate) gf: Vec<CellIdx>,
    /// Neighbor count per cell.
    pub(crate) adjc: Vec<u8>,
    /// Neighbor indices per cell, `adjc[i]` of them valid.
    pub(crate) adjv: Vec<[CellIdx; MAX_NEIGHBORS]>,
}

impl PartitionScratch {
    pub(crate) fn new() -> Self {
        Self {
            f: Vec::with_capacity(MAX_CELLS_PER_PARTITION),
            gf: Vec::with_capacity(MAX_CELLS_PER_PARTITION),
            adjc: Vec::with_capacity(MAX_CELLS_PER_PARTITION),
            adjv: Vec::with_capacity(MAX_CELLS_PER_PARTITION),
        }
    }

    /// Resize every array to `size`. Contents are unspecified afterwards; the
    /// adjacency pass and the propagator initialize what they read.
    pub(crate) fn reset(&mut self, size: usize) {
        debug_assert!(size <= MAX_CELLS_PER_PARTITION);
        self.f.resize(size, 0);
        self.gf.resize(size, 0);
        self.adjc.resize(size, 0);
        self.adjv.resize(size, [0; MAX_NEIGHBORS]);
    }
}
