//! Flat column-major cell storage.
//!
//! The kernels never walk the per-module input directly; they operate on one
//! contiguous structure-of-arrays buffer covering every module, built once per
//! clustering call and read-only from then on.

use crate::types::ModuleCells;

/// All input cells as parallel columns, grouped by module and sorted by
/// `(channel1, channel0)` within each module (the caller's precondition).
pub(crate) struct CellSoa {
    pub(crate) channel0: Vec<u32>,
    pub(crate) channel1: Vec<u32>,
    pub(crate) activation: Vec<f32>,
    /// Per-cell index into [`CellSoa::module_ids`].
    pub(crate) module: Vec<u32>,
    /// One entry per input module, in input order.
    pub(crate) module_ids: Vec<u64>,
}

impl CellSoa {
    pub(crate) fn from_modules(modules: &[ModuleCells]) -> Self {
        let total: usize = modules.iter().map(|m| m.cells.len()).sum();

        let mut soa = Self {
            channel0: Vec::with_capacity(total),
            channel1: Vec::with_capacity(total),
            activation: Vec::with_capacity(total),
            module: Vec::with_capacity(total),
            module_ids: Vec::with_capacity(modules.len()),
        };

        for (module_idx, module) in modules.iter().enumerate() {
            let module_idx = u32::try_from(module_idx).expect("module count exceeds u32 capacity");
            soa.module_ids.push(module.module_id);
            for cell in &module.cells {
                soa.channel0.push(cell.channel0);
                soa.channel1.push(cell.channel1);
                soa.activation.push(cell.activation);
                soa.module.push(module_idx);
            }
        }

        soa
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.channel0.len()
    }
}
