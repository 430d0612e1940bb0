//! Fast-SV label propagation.
//!
//! The partition's connectivity is solved with a parent array `f` and a
//! grandparent cache `gf` (`f ∘ f`), both starting as the identity. Rounds of
//! barrier-separated phases lower labels toward the smallest cell index
//! reachable through the adjacency relation; the round structure is the one a
//! cooperative work-group runs on an accelerator, with each phase boundary
//! standing in for the group barrier. Labels only ever decrease, which is what
//! makes the concurrent formulation race-tolerant and the sequential
//! formulation here a legal schedule of it.
//!
//! On termination `f[i]` is the minimum index of `i`'s cluster and
//! `f[f[i]] == f[i]`; the aggregator keys on exactly that.

use super::constants::{CellIdx, MAX_NEIGHBORS};

/// Which hooking discipline the propagation rounds use.
///
/// Both variants converge to the same labeling; see the variant docs for the
/// trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvVariant {
    /// Default. Each round hooks through the neighbor's cached grandparent and
    /// rewrites both the root slot and the cell's own parent, then shortcuts
    /// against the cached grandparent. Fewest rounds in practice.
    ThreePhase,
    /// Conservative variant. Hooks read the neighbor's parent (not the cached
    /// grandparent) and lower only the root slot; compression is plain pointer
    /// jumping. More rounds, but each phase touches a single slot per cell,
    /// which suits executors with weaker intra-group ordering.
    FourPhase,
}

/// Run label propagation to fixpoint over one partition.
///
/// `f` and `gf` must be `size` long; their contents are overwritten (identity
/// initialization happens here). Returns the number of rounds executed.
pub(crate) fn propagate(
    variant: SvVariant,
    f: &mut [CellIdx],
    gf: &mut [CellIdx],
    adjc: &[u8],
    adjv: &[[CellIdx; MAX_NEIGHBORS]],
) -> u32 {
    let size = f.len();
    debug_assert_eq!(gf.len(), size);
    debug_assert!(adjc.len() >= size && adjv.len() >= size);

    for (i, slot) in f.iter_mut().enumerate() {
        *slot = i as CellIdx;
    }
    gf[..size].copy_from_slice(&f[..size]);

    let rounds = match variant {
        SvVariant::ThreePhase => propagate_three_phase(f, gf, adjc, adjv),
        SvVariant::FourPhase => propagate_four_phase(f, gf, adjc, adjv),
    };

    #[cfg(debug_assertions)]
    for tid in 0..size {
        let root = f[tid] as usize;
        debug_assert_eq!(f[root], f[tid], "labels must be fixpoints of f");
        debug_assert!(root <= tid, "labels must propagate toward smaller indices");
    }

    rounds
}

fn propagate_three_phase(
    f: &mut [CellIdx],
    gf: &mut [CellIdx],
    adjc: &[u8],
    adjv: &[[CellIdx; MAX_NEIGHBORS]],
) -> u32 {
    let size = f.len();
    let mut rounds = 0u32;

    loop {
        rounds += 1;

        // Hook: adopt the smallest grandparent seen among the neighbors,
        // lowering both the current root slot and the cell's own parent.
        // Labels may only ever decrease; an earlier neighbor of the same
        // cell can already have written something smaller, so each store is
        // a guarded minimum, never a blind overwrite.
        for tid in 0..size {
            for k in 0..adjc[tid] as usize {
                let q = gf[adjv[tid][k] as usize];
                if gf[tid] > q {
                    let root = f[tid] as usize;
                    if f[root] > q {
                        f[root] = q;
                    }
                    if f[tid] > q {
                        f[tid] = q;
                    }
                }
            }
        }
        // barrier

        // Shortcut: compress against the grandparent cached last round.
        for tid in 0..size {
            if f[tid] > gf[tid] {
                f[tid] = gf[tid];
            }
        }
        // barrier

        // Refresh the grandparent cache; any change forces another round.
        let mut changed = false;
        for tid in 0..size {
            let ff = f[f[tid] as usize];
            if gf[tid] != ff {
                gf[tid] = ff;
                changed = true;
            }
        }
        // barrier (group-wide or-reduction of `changed`)

        if !changed {
            return rounds;
        }
    }
}

fn propagate_four_phase(
    f: &mut [CellIdx],
    gf: &mut [CellIdx],
    adjc: &[u8],
    adjv: &[[CellIdx; MAX_NEIGHBORS]],
) -> u32 {
    let size = f.len();
    let mut rounds = 0u32;

    loop {
        rounds += 1;

        // Hook: lower the root slot to the smallest neighbor parent.
        let mut hooked = false;
        for tid in 0..size {
            for k in 0..adjc[tid] as usize {
                let q = f[adjv[tid][k] as usize];
                let root = f[tid] as usize;
                if f[root] > q {
                    f[root] = q;
                    hooked = true;
                }
            }
        }
        // barrier

        // Shortcut: one step of pointer jumping.
        let mut jumped = false;
        for tid in 0..size {
            let ff = f[f[tid] as usize];
            if ff < f[tid] {
                f[tid] = ff;
                jumped = true;
            }
        }
        // barrier

        // Keep the grandparent cache coherent for the caller.
        for tid in 0..size {
            gf[tid] = f[f[tid] as usize];
        }
        // barrier (group-wide or-reduction over both flags)

        if !hooked && !jumped {
            return rounds;
        }
    }
}
