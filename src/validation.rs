//! Input precondition checks.
//!
//! The adjacency scans assume each module's cells are sorted by
//! `(channel1, channel0)`; violating that silently corrupts cluster
//! assignments, so the orchestrator runs these checks up front unless the
//! caller opts out.

use rustc_hash::FxHashSet;

use crate::error::ClusterError;
use crate::types::ModuleCells;

/// Check the sort order, activation sign, and module-id uniqueness of the
/// input. One O(N) pass.
pub(crate) fn validate_modules(modules: &[ModuleCells]) -> Result<(), ClusterError> {
    let mut seen: FxHashSet<u64> = FxHashSet::default();

    for module in modules {
        if !seen.insert(module.module_id) {
            return Err(ClusterError::DuplicateModule {
                module_id: module.module_id,
            });
        }

        for (i, cell) in module.cells.iter().enumerate() {
            // activation >= 0 also rejects NaN.
            if !(cell.activation >= 0.0) {
                return Err(ClusterError::InvalidActivation {
                    module_id: module.module_id,
                    index: i,
                });
            }
            if i > 0 {
                let prev = &module.cells[i - 1];
                let ordered = (prev.channel1, prev.channel0) <= (cell.channel1, cell.channel0);
                if !ordered {
                    return Err(ClusterError::NotSorted {
                        module_id: module.module_id,
                        index: i,
                    });
                }
            }
        }
    }

    Ok(())
}
