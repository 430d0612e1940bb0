//! Cluster-to-measurement reduction.

use glam::Vec2;

use super::constants::CellIdx;
use super::partition::Partition;
use super::sink::MeasurementSink;
use super::soa::CellSoa;
use crate::types::Measurement;

/// Number of cluster owners in a converged label array. A cell owns its
/// cluster iff it carries its own index, which the propagation tie-break makes
/// the smallest index of the cluster.
#[inline]
pub(crate) fn count_owners(f: &[CellIdx]) -> usize {
    f.iter()
        .enumerate()
        .filter(|&(i, &label)| label as usize == i)
        .count()
}

/// Reduce every cluster of one partition to a measurement, writing into the
/// output slots `base..base + count_owners(f)` of `sink`.
///
/// Position and spread are folded in a single pass with the weighted Welford
/// recurrence, which stays stable for tight clusters at large absolute pixel
/// indices where the naive sum-of-squares form cancels catastrophically.
pub(crate) fn aggregate_partition(
    soa: &CellSoa,
    part: &Partition,
    f: &[CellIdx],
    base: usize,
    sink: &MeasurementSink<'_>,
) {
    let start = part.start as usize;
    let size = part.size as usize;
    let module_id = soa.module_ids[part.module as usize];
    debug_assert_eq!(f.len(), size);

    let mut slot = base;
    for tid in 0..size {
        if f[tid] as usize != tid {
            continue;
        }

        let mut sum_w = 0.0f32;
        let mut mean = Vec2::ZERO;
        let mut m2 = Vec2::ZERO;

        // Members can only sit at indices >= tid: labels point to the
        // cluster minimum.
        for j in tid..size {
            if f[j] as usize != tid {
                continue;
            }
            let g = start + j;
            let w = soa.activation[g];
            sum_w += w;
            if sum_w > 0.0 {
                let pos = Vec2::new(soa.channel0[g] as f32, soa.channel1[g] as f32);
                let delta = pos - mean;
                mean += delta * (w / sum_w);
                m2 += (pos - mean) * delta * w;
            }
        }

        let variance = if sum_w > 0.0 { m2 / sum_w } else { Vec2::ZERO };

        // SAFETY: `slot` stays within `base..base + count_owners(f)`, a range
        // this partition reserved exclusively from the sink cursor, and each
        // slot is written exactly once (one owner per slot).
        unsafe {
            sink.write(
                slot,
                Measurement {
                    channel0: mean.x,
                    channel1: mean.y,
                    variance0: variance.x,
                    variance1: variance.y,
                    module_id,
                },
            );
        }
        slot += 1;
    }

    debug_assert_eq!(slot - base, count_owners(f));
}
