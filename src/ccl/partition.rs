//! Slicing the cell stream into independently clusterable partitions.

use super::constants::MAX_CELLS_PER_PARTITION;
use super::soa::CellSoa;
use crate::error::ClusterError;

/// A contiguous span of the cell buffer processed as one work unit.
///
/// Invariants: `size <= MAX_CELLS_PER_PARTITION`, all cells belong to the
/// module indexed by `module`, and no 8-adjacent pair of cells is separated
/// by a partition boundary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Partition {
    pub(crate) start: u32,
    pub(crate) size: u32,
    /// Index into [`CellSoa::module_ids`] of the owning module.
    pub(crate) module: u32,
}

/// Walk the sorted cell buffer and emit an ordered partition list covering
/// every cell exactly once.
///
/// A split is taken between cells `i-1` and `i` when `i` starts a new module
/// (mandatory: adjacency never crosses modules), or when `channel1` jumps by
/// more than one and the open partition has already reached `min_size`. A
/// `channel1` jump > 1 guarantees no cell left of the split is 8-adjacent to
/// any cell right of it, so splitting there is always safe; the size
/// threshold only prevents over-splitting.
pub(crate) fn partition_cells(
    soa: &CellSoa,
    min_size: usize,
) -> Result<Vec<Partition>, ClusterError> {
    let n = soa.len();
    let mut partitions = Vec::new();
    if n == 0 {
        return Ok(partitions);
    }

    let mut start = 0usize;
    for i in 1..=n {
        let size = i - start;
        if i == n {
            partitions.push(close(soa, start, size));
            break;
        }

        let module_break = soa.module[i] != soa.module[i - 1];
        let row_gap = !module_break && soa.channel1[i] > soa.channel1[i - 1].saturating_add(1);

        if module_break || (row_gap && size >= min_size) {
            partitions.push(close(soa, start, size));
            start = i;
        } else if size == MAX_CELLS_PER_PARTITION {
            // Cell i would have to join a full partition with no admissible
            // split point before it.
            return Err(ClusterError::PartitionTooLarge {
                module_id: soa.module_ids[soa.module[i] as usize],
            });
        }
    }

    Ok(partitions)
}

#[inline]
fn close(soa: &CellSoa, start: usize, size: usize) -> Partition {
    debug_assert!(size > 0 && size <= MAX_CELLS_PER_PARTITION);
    Partition {
        start: start as u32,
        size: size as u32,
        module: soa.module[start],
    }
}
