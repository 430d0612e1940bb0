//! Per-cell 8-neighbor lookup within a partition.

use super::constants::{CellIdx, MAX_NEIGHBORS};
use super::partition::Partition;
use super::soa::CellSoa;

/// Two cells are 8-adjacent when they sit on the same module and differ by at
/// most one pixel on each axis. A cell is not its own neighbor.
#[inline]
fn is_adjacent(soa: &CellSoa, a: usize, b: usize) -> bool {
    soa.channel0[a].abs_diff(soa.channel0[b]) <= 1
        && soa.channel1[a].abs_diff(soa.channel1[b]) <= 1
        && soa.module[a] == soa.module[b]
}

/// Fill `adjc`/`adjv` with each cell's neighbor count and neighbor indices
/// (partition-local) for one partition.
///
/// The sort order bounds the search: scanning backward, no cell before the
/// first one with `channel1 + 1 < channel1[tid]` can be adjacent; scanning
/// forward, no cell after the first one with `channel1 > channel1[tid] + 1`
/// can be. Both scans also stop at a module change.
pub(crate) fn reduce_adjacency(
    soa: &CellSoa,
    part: &Partition,
    adjc: &mut [u8],
    adjv: &mut [[CellIdx; MAX_NEIGHBORS]],
) {
    let start = part.start as usize;
    let size = part.size as usize;
    debug_assert!(adjc.len() >= size && adjv.len() >= size);

    for tid in 0..size {
        let g = start + tid;
        let c1 = soa.channel1[g];
        let mut count = 0u8;

        // Backward scan.
        for j in (0..tid).rev() {
            let gj = start + j;
            if soa.channel1[gj] < c1.saturating_sub(1) || soa.module[gj] != soa.module[g] {
                break;
            }
            if is_adjacent(soa, g, gj) {
                push_neighbor(&mut adjv[tid], &mut count, j as CellIdx);
            }
        }

        // Forward scan.
        for j in tid + 1..size {
            let gj = start + j;
            if soa.channel1[gj] > c1.saturating_add(1) || soa.module[gj] != soa.module[g] {
                break;
            }
            if is_adjacent(soa, g, gj) {
                push_neighbor(&mut adjv[tid], &mut count, j as CellIdx);
            }
        }

        adjc[tid] = count;
    }
}

#[inline]
fn push_neighbor(slots: &mut [CellIdx; MAX_NEIGHBORS], count: &mut u8, j: CellIdx) {
    // More than 8 candidates means the input repeated a pixel; dropping the
    // extras keeps the buffer bound intact.
    debug_assert!(
        (*count as usize) < MAX_NEIGHBORS,
        "cell has more than {} neighbors (duplicate pixels in input?)",
        MAX_NEIGHBORS
    );
    if (*count as usize) < MAX_NEIGHBORS {
        slots[*count as usize] = j;
        *count += 1;
    }
}
