//! Sparse connected-component labeling for detector pixel data.
//!
//! This crate groups pixel activations ("cells") into clusters under
//! 8-neighborhood adjacency and reduces each cluster to a single measurement:
//! the activation-weighted mean position and the weighted variance along both
//! channel axes. Cells never connect across detector modules.
//!
//! The input is one sorted cell list per module; the work is split into
//! independent partitions of the cell stream that are clustered in parallel
//! with a Fast-SV label propagation kernel.
//!
//! # Example
//!
//! ```
//! use sparse_ccl::{cluster, Cell, ModuleCells};
//!
//! // Cells within a module must be sorted by (channel1, channel0).
//! let module = ModuleCells {
//!     module_id: 7,
//!     cells: vec![
//!         Cell::new(4, 2, 1.0, 0.0),
//!         Cell::new(5, 2, 3.0, 0.0),
//!     ],
//! };
//!
//! let output = cluster(&[module]).expect("clustering should succeed");
//! assert_eq!(output.modules.len(), 1);
//! // The two cells touch, so they form a single cluster.
//! assert_eq!(output.modules[0].measurements.len(), 1);
//! assert_eq!(output.modules[0].measurements[0].channel0, 4.75);
//! ```

mod error;
mod types;
mod validation;

// Internal kernel modules
pub(crate) mod ccl;

pub use ccl::fastsv::SvVariant;
pub use error::ClusterError;
pub use types::{Cell, ClusterOutput, ClusterStats, Measurement, ModuleCells, ModuleMeasurements};

/// Configuration for a clustering call.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// If true, check the input preconditions (per-module sort order,
    /// nonnegative activations, distinct module ids) before clustering.
    ///
    /// The check is a single O(N) pass; disable it only when the producer of
    /// the cell lists already guarantees the invariants. With validation off,
    /// an unsorted module yields unspecified cluster assignments.
    pub validate: bool,
    /// Optional override for the minimum partition size. When None, partitions
    /// grow to at least twice the work-group width before a row gap is taken
    /// as a split point. Values above the hard partition cap are clamped.
    pub min_partition_size: Option<usize>,
    /// Which label-propagation variant runs inside each partition. Both
    /// variants produce identical measurements; they differ in how
    /// aggressively each round hooks subtrees.
    pub variant: SvVariant,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            validate: true,
            min_partition_size: None,
            variant: SvVariant::ThreePhase,
        }
    }
}

/// Cluster per-module cell lists into per-module measurement lists with
/// default settings.
///
/// Errors are reserved for invalid inputs (unsorted cells, negative
/// activations, a dense module run exceeding the partition cap).
pub fn cluster(modules: &[ModuleCells]) -> Result<ClusterOutput, ClusterError> {
    cluster_with(modules, ClusterConfig::default())
}

/// Cluster per-module cell lists with explicit configuration.
pub fn cluster_with(
    modules: &[ModuleCells],
    config: ClusterConfig,
) -> Result<ClusterOutput, ClusterError> {
    ccl::cluster_core(modules, &config)
}
