#![allow(dead_code)]

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sparse_ccl::{Cell, Measurement, ModuleCells};

/// Build a module from `(channel0, channel1, activation)` triples, sorting
/// them into the required `(channel1, channel0)` order.
pub fn module(module_id: u64, pixels: &[(u32, u32, f32)]) -> ModuleCells {
    let mut cells: Vec<Cell> = pixels
        .iter()
        .map(|&(c0, c1, w)| Cell::new(c0, c1, w, 0.0))
        .collect();
    cells.sort_by_key(|c| (c.channel1, c.channel0));
    ModuleCells { module_id, cells }
}

/// Unit-weight variant of [`module`].
pub fn module_unit(module_id: u64, pixels: &[(u32, u32)]) -> ModuleCells {
    let unit: Vec<(u32, u32, f32)> = pixels.iter().map(|&(c0, c1)| (c0, c1, 1.0)).collect();
    module(module_id, &unit)
}

/// A `width x height` module where each pixel fires independently with
/// probability `occupancy`, with random activations. Cells come out in sort
/// order by construction.
pub fn random_sparse_module(
    module_id: u64,
    width: u32,
    height: u32,
    occupancy: f64,
    seed: u64,
) -> ModuleCells {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ module_id);
    let mut cells = Vec::new();
    for c1 in 0..height {
        for c0 in 0..width {
            if rng.gen_bool(occupancy) {
                cells.push(Cell::new(c0, c1, rng.gen_range(0.1..10.0f32), 0.0));
            }
        }
    }
    ModuleCells { module_id, cells }
}

/// Reference measurement computed without the engine: f64 two-pass weighted
/// mean and variance.
#[derive(Debug, Clone, Copy)]
pub struct RefMeasurement {
    pub channel0: f64,
    pub channel1: f64,
    pub variance0: f64,
    pub variance1: f64,
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        let idx = x as usize;
        let p = self.parent[idx];
        if p != x {
            let root = self.find(p);
            self.parent[idx] = root;
        }
        self.parent[idx]
    }

    // Order-dependent union: the smaller index always becomes the representative.
    fn union_keep_min(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (min, max) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        self.parent[max as usize] = min;
    }
}

/// Brute-force O(n^2) connected components plus two-pass statistics for one
/// module's cells.
pub fn reference_measurements(cells: &[Cell]) -> Vec<RefMeasurement> {
    let n = cells.len();
    let mut uf = UnionFind::new(n);
    for i in 0..n {
        for j in i + 1..n {
            let a = &cells[i];
            let b = &cells[j];
            if a.channel0.abs_diff(b.channel0) <= 1 && a.channel1.abs_diff(b.channel1) <= 1 {
                uf.union_keep_min(i as u32, j as u32);
            }
        }
    }

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut root_to_cluster: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        let root = uf.find(i as u32) as usize;
        let slot = match root_to_cluster[root] {
            Some(s) => s,
            None => {
                root_to_cluster[root] = Some(clusters.len());
                clusters.push(Vec::new());
                clusters.len() - 1
            }
        };
        clusters[slot].push(i);
    }

    clusters
        .iter()
        .map(|members| {
            let mut sw = 0.0f64;
            let mut s0 = 0.0f64;
            let mut s1 = 0.0f64;
            for &i in members {
                let w = cells[i].activation as f64;
                sw += w;
                s0 += w * cells[i].channel0 as f64;
                s1 += w * cells[i].channel1 as f64;
            }
            if sw == 0.0 {
                return RefMeasurement {
                    channel0: 0.0,
                    channel1: 0.0,
                    variance0: 0.0,
                    variance1: 0.0,
                };
            }
            let m0 = s0 / sw;
            let m1 = s1 / sw;
            let mut v0 = 0.0f64;
            let mut v1 = 0.0f64;
            for &i in members {
                let w = cells[i].activation as f64;
                v0 += w * (cells[i].channel0 as f64 - m0).powi(2);
                v1 += w * (cells[i].channel1 as f64 - m1).powi(2);
            }
            RefMeasurement {
                channel0: m0,
                channel1: m1,
                variance0: v0 / sw,
                variance1: v1 / sw,
            }
        })
        .collect()
}

/// Sort a measurement list into a canonical order for comparison.
pub fn canonical(measurements: &[Measurement]) -> Vec<Measurement> {
    let mut sorted = measurements.to_vec();
    sorted.sort_by(|a, b| {
        (a.channel1, a.channel0)
            .partial_cmp(&(b.channel1, b.channel0))
            .expect("measurement positions must not be NaN")
    });
    sorted
}

/// Assert that engine output and reference agree as multisets, within a
/// floating-point tolerance.
pub fn assert_matches_reference(actual: &[Measurement], expected: &[RefMeasurement]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "cluster count mismatch: engine={}, reference={}",
        actual.len(),
        expected.len()
    );

    let actual = canonical(actual);
    let mut expected: Vec<RefMeasurement> = expected.to_vec();
    expected.sort_by(|a, b| {
        (a.channel1, a.channel0)
            .partial_cmp(&(b.channel1, b.channel0))
            .expect("reference positions must not be NaN")
    });

    for (i, (a, e)) in actual.iter().zip(&expected).enumerate() {
        // f32 accumulation against an f64 reference: scale the tolerance with
        // the magnitude so large percolating clusters don't trip it.
        let tol = 1e-3 + 1e-5 * (e.channel0.abs() + e.channel1.abs());
        assert!(
            (a.channel0 as f64 - e.channel0).abs() < tol
                && (a.channel1 as f64 - e.channel1).abs() < tol,
            "cluster {} centroid mismatch: engine=({}, {}), reference=({}, {})",
            i,
            a.channel0,
            a.channel1,
            e.channel0,
            e.channel1
        );
        let tol = 1e-3 + 1e-4 * (e.variance0.abs() + e.variance1.abs());
        assert!(
            (a.variance0 as f64 - e.variance0).abs() < tol
                && (a.variance1 as f64 - e.variance1).abs() < tol,
            "cluster {} variance mismatch: engine=({}, {}), reference=({}, {})",
            i,
            a.variance0,
            a.variance1,
            e.variance0,
            e.variance1
        );
    }
}
