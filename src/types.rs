//! Core data types for cell clustering.

use bytemuck::{Pod, Zeroable};

/// A single pixel activation inside a detector module.
///
/// `channel0` and `channel1` are the integer pixel coordinates on the two
/// module axes; `activation` is the nonnegative signal weight used for the
/// centroid; `time` is carried for the producer's benefit and does not enter
/// the clustering.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Cell {
    pub channel0: u32,
    pub channel1: u32,
    pub activation: f32,
    pub time: f32,
}

impl Cell {
    #[inline]
    pub const fn new(channel0: u32, channel1: u32, activation: f32, time: f32) -> Self {
        Self {
            channel0,
            channel1,
            activation,
            time,
        }
    }
}

/// One cluster reduced to its activation-weighted centroid.
///
/// `channel0`/`channel1` are the weighted mean positions; `variance0`/
/// `variance1` are the weighted variances along the two axes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Measurement {
    pub channel0: f32,
    pub channel1: f32,
    pub variance0: f32,
    pub variance1: f32,
    pub module_id: u64,
}

/// Input: the cells of one detector module.
///
/// The cell list must be sorted by `channel1` ascending, ties broken by
/// `channel0` ascending. The partitioner and the adjacency scans rely on this
/// order.
#[derive(Debug, Clone)]
pub struct ModuleCells {
    pub module_id: u64,
    pub cells: Vec<Cell>,
}

/// Output: the measurements of one detector module, in no particular order.
#[derive(Debug, Clone)]
pub struct ModuleMeasurements {
    pub module_id: u64,
    pub measurements: Vec<Measurement>,
}

/// Result of one clustering call.
#[derive(Debug, Clone)]
pub struct ClusterOutput {
    /// One entry per input module, in input order.
    pub modules: Vec<ModuleMeasurements>,
    pub stats: ClusterStats,
}

/// Summary counters for one clustering call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterStats {
    /// Total number of input cells.
    pub cells: usize,
    /// Number of partitions the cell stream was split into.
    pub partitions: usize,
    /// Total number of measurements (= number of clusters).
    pub measurements: usize,
    /// Largest number of label-propagation rounds any partition needed.
    pub max_rounds: u32,
}
