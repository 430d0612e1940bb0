//! The parallel connected-component labeling engine.
//!
//! One clustering call flattens the per-module input into a column-major cell
//! buffer, slices it into independently clusterable partitions, and runs the
//! adjacency → label-propagation → aggregation kernel over the partitions in
//! parallel. Partitions share nothing but the atomic cursor of the output
//! buffer, so the outer loop is embarrassingly parallel; all synchronization
//! lives inside a partition as the phase structure of the propagator.

pub(crate) mod adjacency;
pub(crate) mod aggregate;
pub(crate) mod constants;
pub(crate) mod fastsv;
pub(crate) mod partition;
pub(crate) mod scratch;
pub(crate) mod sink;
pub(crate) mod soa;
pub(crate) mod timing;

use std::sync::OnceLock;

use bytemuck::Zeroable;

use crate::error::ClusterError;
use crate::types::{ClusterOutput, ClusterStats, Measurement, ModuleCells, ModuleMeasurements};
use crate::validation;
use crate::ClusterConfig;

use constants::{MAX_CELLS_PER_PARTITION, MIN_PARTITION_SIZE};
use partition::Partition;
use scratch::PartitionScratch;
use sink::MeasurementSink;
use soa::CellSoa;
use timing::{Timer, TimingBuilder};

fn log_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("SPARSE_CCL_LOG")
            .ok()
            .map_or(false, |v| v == "1" || v.eq_ignore_ascii_case("true"))
    })
}

/// Where one partition's output landed in the flat measurement buffer.
#[derive(Debug, Clone, Copy)]
struct PartitionResult {
    base: usize,
    count: u32,
    rounds: u32,
}

/// Run the full pipeline: validate, flatten, partition, cluster, demultiplex.
pub(crate) fn cluster_core(
    modules: &[ModuleCells],
    config: &ClusterConfig,
) -> Result<ClusterOutput, ClusterError> {
    let mut tb = TimingBuilder::new();

    let t = Timer::start();
    if config.validate {
        validation::validate_modules(modules)?;
    }
    tb.set_validate(t.elapsed());

    let t = Timer::start();
    let soa = CellSoa::from_modules(modules);
    tb.set_soa_build(t.elapsed());

    let t = Timer::start();
    let min_size = config
        .min_partition_size
        .unwrap_or(MIN_PARTITION_SIZE)
        .clamp(1, MAX_CELLS_PER_PARTITION);
    let partitions = partition::partition_cells(&soa, min_size)?;
    tb.set_partition(t.elapsed());

    if log_enabled() && !partitions.is_empty() {
        let largest = partitions.iter().map(|p| p.size).max().unwrap_or(0);
        eprintln!(
            "partitioner: {} cells -> {} partitions (largest={}, min_target={})",
            soa.len(),
            partitions.len(),
            largest,
            min_size
        );
    }

    // At most one cluster per cell, so capacity N can never overflow.
    let t = Timer::start();
    let mut measurements = vec![Measurement::zeroed(); soa.len()];
    let results = run_kernel(&soa, &partitions, config, &mut measurements);
    tb.set_kernel(t.elapsed());

    let total: usize = results.iter().map(|r| r.count as usize).sum();
    let max_rounds = results.iter().map(|r| r.rounds).max().unwrap_or(0);

    if log_enabled() {
        eprintln!(
            "ccl: {} clusters from {} cells ({} partitions, max {} rounds)",
            total,
            soa.len(),
            partitions.len(),
            max_rounds
        );
    }

    // Demultiplex in partition order. Each partition knows its module, and its
    // slice of the flat buffer is internally deterministic, so the per-module
    // lists do not depend on how the parallel pass interleaved reservations.
    let t = Timer::start();
    let mut out: Vec<ModuleMeasurements> = modules
        .iter()
        .map(|m| ModuleMeasurements {
            module_id: m.module_id,
            measurements: Vec::new(),
        })
        .collect();
    for (part, result) in partitions.iter().zip(&results) {
        let slice = &measurements[result.base..result.base + result.count as usize];
        out[part.module as usize].measurements.extend_from_slice(slice);
    }
    tb.set_demux(t.elapsed());

    let stats = ClusterStats {
        cells: soa.len(),
        partitions: partitions.len(),
        measurements: total,
        max_rounds,
    };

    tb.finish().report(soa.len());

    Ok(ClusterOutput {
        modules: out,
        stats,
    })
}

/// Dispatch one worker per partition and collect the reservation extents in
/// partition order.
fn run_kernel(
    soa: &CellSoa,
    partitions: &[Partition],
    config: &ClusterConfig,
    measurements: &mut [Measurement],
) -> Vec<PartitionResult> {
    let sink = MeasurementSink::new(measurements);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        partitions
            .par_iter()
            .map_init(PartitionScratch::new, |scratch, part| {
                process_partition(soa, part, config.variant, scratch, &sink)
            })
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut scratch = PartitionScratch::new();
        partitions
            .iter()
            .map(|part| process_partition(soa, part, config.variant, &mut scratch, &sink))
            .collect()
    }
}

/// The per-partition kernel: adjacency, label propagation, aggregation.
fn process_partition(
    soa: &CellSoa,
    part: &Partition,
    variant: fastsv::SvVariant,
    scratch: &mut PartitionScratch,
    sink: &MeasurementSink<'_>,
) -> PartitionResult {
    let size = part.size as usize;
    scratch.reset(size);

    adjacency::reduce_adjacency(soa, part, &mut scratch.adjc, &mut scratch.adjv);
    let rounds = fastsv::propagate(
        variant,
        &mut scratch.f,
        &mut scratch.gf,
        &scratch.adjc,
        &scratch.adjv,
    );

    // One global reservation for the whole partition, after the owner-count
    // reduction; owners then fill base..base+count in label order.
    let owners = aggregate::count_owners(&scratch.f);
    let base = sink.reserve(owners);
    aggregate::aggregate_partition(soa, part, &scratch.f, base, sink);

    PartitionResult {
        base,
        count: owners as u32,
        rounds,
    }
}
