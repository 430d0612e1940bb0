//! Benchmark sparse CCL at large scales.
//!
//! Run with: cargo run --release --bin bench_ccl
//!
//! Usage:
//!   bench_ccl                  Run default size (1m cells)
//!   bench_ccl 100k 1m 4m       Run multiple sizes
//!   bench_ccl --occupancy 0.5  Denser pixel bands (larger clusters)
//!   bench_ccl -n 10            Run 10 iterations per size
//!
//! For per-phase timing, build with: cargo run --release --features timing --bin bench_ccl

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sparse_ccl::{cluster_with, Cell, ClusterConfig, ModuleCells};
use std::time::Instant;

fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.to_lowercase();
    let (num_str, multiplier) = if s.ends_with('m') {
        (&s[..s.len() - 1], 1_000_000)
    } else if s.ends_with('k') {
        (&s[..s.len() - 1], 1_000)
    } else {
        (s.as_str(), 1)
    };

    num_str
        .parse::<f64>()
        .map(|n| (n * multiplier as f64) as usize)
        .map_err(|e| format!("Invalid number '{}': {}", s, e))
}

#[derive(Parser)]
#[command(about = "Benchmark sparse connected-component labeling")]
struct Args {
    /// Total cell counts to run (accepts k/m suffixes).
    #[arg(value_parser = parse_count)]
    sizes: Vec<usize>,

    /// Number of detector modules the cells are spread over.
    #[arg(long, default_value_t = 128)]
    modules: usize,

    /// Probability that a pixel inside an active band fires.
    #[arg(long, default_value_t = 0.25)]
    occupancy: f64,

    /// Iterations per size (best time is reported).
    #[arg(short = 'n', long, default_value_t = 3)]
    iterations: usize,

    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Fill one module with roughly `target` cells: rows of a fixed-width band
/// fire independently, with an empty guard row every few rows so the
/// partitioner has split points. Construction order is the required
/// (channel1, channel0) sort order.
fn generate_module<R: Rng>(module_id: u64, target: usize, occupancy: f64, rng: &mut R) -> ModuleCells {
    const BAND_WIDTH: u32 = 512;

    let mut cells = Vec::with_capacity(target);
    let mut c1 = 0u32;
    while cells.len() < target {
        // Leave every fourth row empty.
        if c1 % 4 != 3 {
            for c0 in 0..BAND_WIDTH {
                if rng.gen_bool(occupancy) {
                    let activation = rng.gen_range(0.1..10.0f32);
                    cells.push(Cell::new(c0, c1, activation, 0.0));
                    if cells.len() == target {
                        break;
                    }
                }
            }
        }
        c1 += 1;
    }

    ModuleCells { module_id, cells }
}

fn main() {
    let args = Args::parse();
    let sizes = if args.sizes.is_empty() {
        vec![1_000_000]
    } else {
        args.sizes.clone()
    };

    let num_modules = args.modules.max(1);
    let occupancy = args.occupancy.clamp(0.01, 1.0);
    for &size in &sizes {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        let per_module = size.div_ceil(num_modules);
        let modules: Vec<ModuleCells> = (0..num_modules)
            .map(|m| generate_module(m as u64, per_module, occupancy, &mut rng))
            .collect();
        let total_cells: usize = modules.iter().map(|m| m.cells.len()).sum();

        // Validate once up front, then benchmark the kernel alone.
        let config = ClusterConfig {
            validate: false,
            ..ClusterConfig::default()
        };
        cluster_with(&modules, ClusterConfig::default()).expect("generated input must be valid");

        let mut best = f64::INFINITY;
        let mut stats = None;
        for _ in 0..args.iterations.max(1) {
            let t = Instant::now();
            let output = cluster_with(&modules, config.clone()).expect("clustering failed");
            let dt = t.elapsed().as_secs_f64();
            if dt < best {
                best = dt;
            }
            stats = Some(output.stats);
        }
        let stats = stats.unwrap();

        println!(
            "{:>10} cells  {:>9} clusters  {:>6} partitions  max_rounds={:<2}  {:8.2} ms  {:7.1} Mcells/s",
            total_cells,
            stats.measurements,
            stats.partitions,
            stats.max_rounds,
            best * 1000.0,
            total_cells as f64 / best / 1.0e6
        );
    }
}
