//! Public API integration tests for sparse-ccl.

mod support;

use sparse_ccl::{cluster, cluster_with, ClusterConfig, ClusterError, Cell, ModuleCells, SvVariant};
use support::cells::{canonical, module, module_unit};

#[test]
fn test_single_cell() {
    let output = cluster(&[module(1, &[(5, 7, 1.0)])]).expect("cluster should succeed");

    assert_eq!(output.modules.len(), 1);
    let m = &output.modules[0].measurements;
    assert_eq!(m.len(), 1);
    assert_eq!(m[0].channel0, 5.0);
    assert_eq!(m[0].channel1, 7.0);
    assert_eq!(m[0].variance0, 0.0);
    assert_eq!(m[0].variance1, 0.0);
    assert_eq!(m[0].module_id, 1);
}

#[test]
fn test_two_disjoint_cells() {
    let output = cluster(&[module(1, &[(0, 0, 1.0), (0, 5, 1.0)])]).unwrap();

    let m = canonical(&output.modules[0].measurements);
    assert_eq!(m.len(), 2);
    assert_eq!((m[0].channel0, m[0].channel1), (0.0, 0.0));
    assert_eq!((m[1].channel0, m[1].channel1), (0.0, 5.0));
    assert!(m.iter().all(|x| x.variance0 == 0.0 && x.variance1 == 0.0));
}

#[test]
fn test_horizontal_line_variance() {
    let output = cluster(&[module(1, &[(0, 0, 1.0), (1, 0, 1.0), (2, 0, 1.0)])]).unwrap();

    let m = &output.modules[0].measurements;
    assert_eq!(m.len(), 1);
    assert!((m[0].channel0 - 1.0).abs() < 1e-6);
    assert_eq!(m[0].channel1, 0.0);
    assert!((m[0].variance0 - 2.0 / 3.0).abs() < 1e-6);
    assert_eq!(m[0].variance1, 0.0);
}

#[test]
fn test_weighted_l_shape() {
    let output = cluster(&[module(1, &[(0, 0, 2.0), (1, 0, 1.0), (1, 1, 1.0)])]).unwrap();

    let m = &output.modules[0].measurements;
    assert_eq!(m.len(), 1);
    assert!((m[0].channel0 - 0.5).abs() < 1e-6);
    assert!((m[0].channel1 - 0.25).abs() < 1e-6);
}

#[test]
fn test_row_gap_separates_clusters() {
    // Two 2-cell clusters separated by a channel1 gap of 2; the partitioner
    // may split between them without changing the result.
    let input = [module(
        1,
        &[(0, 0, 1.0), (1, 0, 1.0), (0, 2, 1.0), (1, 2, 1.0)],
    )];

    for min_size in [1, 2, 4, 4096] {
        let config = ClusterConfig {
            min_partition_size: Some(min_size),
            ..ClusterConfig::default()
        };
        let output = cluster_with(&input, config).unwrap();
        let m = canonical(&output.modules[0].measurements);
        assert_eq!(m.len(), 2, "min_size={}", min_size);
        assert!((m[0].channel0 - 0.5).abs() < 1e-6);
        assert_eq!(m[0].channel1, 0.0);
        assert!((m[1].channel0 - 0.5).abs() < 1e-6);
        assert_eq!(m[1].channel1, 2.0);
    }
}

#[test]
fn test_identical_patterns_on_two_modules() {
    let pattern: &[(u32, u32)] = &[(0, 0), (1, 0), (5, 5)];
    let output = cluster(&[module_unit(10, pattern), module_unit(20, pattern)]).unwrap();

    assert_eq!(output.modules.len(), 2);
    assert_eq!(output.modules[0].module_id, 10);
    assert_eq!(output.modules[1].module_id, 20);

    let a = canonical(&output.modules[0].measurements);
    let b = canonical(&output.modules[1].measurements);
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!((x.channel0, x.channel1), (y.channel0, y.channel1));
        assert_eq!(x.module_id, 10);
        assert_eq!(y.module_id, 20);
    }
}

#[test]
fn test_empty_input() {
    let output = cluster(&[]).unwrap();
    assert!(output.modules.is_empty());
    assert_eq!(output.stats.cells, 0);
    assert_eq!(output.stats.measurements, 0);
}

#[test]
fn test_empty_module_yields_empty_list() {
    let empty = ModuleCells {
        module_id: 3,
        cells: Vec::new(),
    };
    let output = cluster(&[empty, module_unit(4, &[(0, 0)])]).unwrap();

    assert_eq!(output.modules.len(), 2);
    assert_eq!(output.modules[0].module_id, 3);
    assert!(output.modules[0].measurements.is_empty());
    assert_eq!(output.modules[1].measurements.len(), 1);
}

#[test]
fn test_unsorted_input_rejected() {
    let bad = ModuleCells {
        module_id: 8,
        cells: vec![Cell::new(0, 3, 1.0, 0.0), Cell::new(0, 1, 1.0, 0.0)],
    };
    assert_eq!(
        cluster(&[bad]).unwrap_err(),
        ClusterError::NotSorted {
            module_id: 8,
            index: 1
        }
    );
}

#[test]
fn test_unsorted_input_accepted_without_validation() {
    // With validation off the call must not error; the labeling itself is
    // unspecified for unsorted input.
    let bad = ModuleCells {
        module_id: 8,
        cells: vec![Cell::new(0, 3, 1.0, 0.0), Cell::new(0, 1, 1.0, 0.0)],
    };
    let config = ClusterConfig {
        validate: false,
        ..ClusterConfig::default()
    };
    assert!(cluster_with(&[bad], config).is_ok());
}

#[test]
fn test_negative_activation_rejected() {
    let bad = ModuleCells {
        module_id: 2,
        cells: vec![Cell::new(0, 0, -0.5, 0.0)],
    };
    assert_eq!(
        cluster(&[bad]).unwrap_err(),
        ClusterError::InvalidActivation {
            module_id: 2,
            index: 0
        }
    );
}

#[test]
fn test_duplicate_module_rejected() {
    let a = module_unit(9, &[(0, 0)]);
    let b = module_unit(9, &[(4, 4)]);
    assert_eq!(
        cluster(&[a, b]).unwrap_err(),
        ClusterError::DuplicateModule { module_id: 9 }
    );
}

#[test]
fn test_dense_module_exceeding_partition_cap() {
    // 2100 cells over contiguous rows: no channel1 break to split at.
    let mut pixels = Vec::new();
    for c1 in 0..30u32 {
        for c0 in 0..70u32 {
            pixels.push((c0, c1));
        }
    }
    let err = cluster(&[module_unit(6, &pixels)]).unwrap_err();
    assert_eq!(err, ClusterError::PartitionTooLarge { module_id: 6 });
}

#[test]
fn test_error_messages_name_the_module() {
    let err = ClusterError::PartitionTooLarge { module_id: 77 };
    assert!(err.to_string().contains("77"));
    let err = ClusterError::NotSorted {
        module_id: 5,
        index: 12,
    };
    assert!(err.to_string().contains('5') && err.to_string().contains("12"));
}

#[test]
fn test_both_variants_through_public_api() {
    let input = [module_unit(1, &[(0, 0), (1, 1), (2, 0), (9, 9)])];

    let three = cluster_with(&input, ClusterConfig::default()).unwrap();
    let four = cluster_with(
        &input,
        ClusterConfig {
            variant: SvVariant::FourPhase,
            ..ClusterConfig::default()
        },
    )
    .unwrap();

    assert_eq!(
        canonical(&three.modules[0].measurements),
        canonical(&four.modules[0].measurements)
    );
}

#[test]
fn test_stats_counters() {
    let output = cluster(&[module_unit(1, &[(0, 0), (1, 0), (8, 8)])]).unwrap();
    assert_eq!(output.stats.cells, 3);
    assert_eq!(output.stats.measurements, 2);
    assert_eq!(output.stats.partitions, 1);
    assert!(output.stats.max_rounds >= 1);
}
