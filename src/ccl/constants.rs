//! Shared constants for the clustering kernels.

/// Work-group width the kernels are sized for. On a CPU build this only
/// enters through [`MIN_PARTITION_SIZE`]; the constant is kept so the
/// partition shape matches accelerator deployments of the same algorithm.
pub(crate) const WORK_GROUP_SIZE: usize = 256;

/// Hard cap on the number of cells in one partition. The per-partition label
/// scratch is sized for this, and [`CellIdx`] must be able to address it.
pub(crate) const MAX_CELLS_PER_PARTITION: usize = 2048;

/// Partitions are grown to at least this many cells (when the module allows)
/// before a `channel1` gap is taken as a split point, amortizing per-partition
/// dispatch overhead.
pub(crate) const MIN_PARTITION_SIZE: usize = 2 * WORK_GROUP_SIZE;

/// A pixel has at most 8 neighbors in the 2D grid; the adjacency slots per
/// cell are sized for exactly that.
pub(crate) const MAX_NEIGHBORS: usize = 8;

/// Intra-partition cell index. 16 bits cover the partition cap.
pub(crate) type CellIdx = u16;

const _: () = assert!(MAX_CELLS_PER_PARTITION - 1 <= CellIdx::MAX as usize);
const _: () = assert!(MIN_PARTITION_SIZE <= MAX_CELLS_PER_PARTITION);
