//! Properties of the interval randomizer and the null distribution.
//!
//! The randomizer must keep every duration, never overlap or touch two
//! intervals, stay inside the phase, and fail in bounded time when the
//! durations cannot be packed.

use cohort_dynamics::statistics::{
    expected_matrices, null_distribution, resample_intervals, Baseline, NullModelInput,
};
use cohort_dynamics::{DirectionIntervals, DirectionKey, EngineError, MotionIntervals};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const K: DirectionKey = DirectionKey::new(3, 4);

fn check_placement(durations: &[f64], phase: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let placement = resample_intervals(durations, phase, 10_000, &mut rng).unwrap();

    let mut got = placement.durations();
    let mut want = durations.to_vec();
    got.sort_by(|a, b| a.total_cmp(b));
    want.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(got.len(), want.len());
    for (g, w) in got.iter().zip(&want) {
        assert!((g - w).abs() < 1e-9, "seed {seed}: duration {g} != {w}");
    }

    for (&s, &e) in placement.starts.iter().zip(&placement.ends) {
        assert!(s >= 0.0 && s < phase, "seed {seed}: start {s} outside phase");
        assert!(e <= phase, "seed {seed}: end {e} past phase");
    }
    for i in 1..placement.starts.len() {
        assert!(
            placement.ends[i - 1] < placement.starts[i],
            "seed {seed}: intervals {} and {i} touch",
            i - 1
        );
    }
}

#[test]
fn random_duration_sets_pack_cleanly() {
    let mut sizes = StdRng::seed_from_u64(0xC0FFEE);
    for seed in 0..50 {
        let n = sizes.random_range(1..40);
        let durations: Vec<f64> = (0..n).map(|_| sizes.random_range(0.5..60.0)).collect();
        check_placement(&durations, 3600.0, seed);
    }
}

#[test]
fn half_full_phase_packs() {
    let durations = vec![30.0; 60];
    check_placement(&durations, 3600.0, 99);
}

#[test]
fn hopeless_packing_fails_in_bounded_time() {
    // Fits end to end but never by uniform dropping.
    let durations = vec![9.9; 10];
    let mut rng = StdRng::seed_from_u64(1);
    let err = resample_intervals(&durations, 100.0, 50, &mut rng).unwrap_err();
    assert!(matches!(err, EngineError::PackingExhausted { restarts: 50, .. }));
}

fn subject(pairs: &[(f64, f64)]) -> MotionIntervals {
    let (starts, ends) = pairs.iter().copied().unzip();
    let mut intervals = MotionIntervals::default();
    intervals.insert(K, DirectionIntervals::new(starts, ends));
    intervals
}

#[test]
fn null_distribution_shape_and_baselines() {
    let subjects = vec!["x".to_string(), "y".to_string(), "z".to_string()];
    let intervals = vec![
        subject(&[(0.0, 30.0), (500.0, 560.0), (1200.0, 1290.0)]),
        subject(&[(10.0, 45.0), (900.0, 920.0)]),
        subject(&[(2000.0, 2100.0)]),
    ];
    let input = NullModelInput {
        subjects: &subjects,
        intervals: &intervals,
        keys: &[K],
        duration: 3600.0,
        max_restarts: 1_000,
    };

    let samples = null_distribution(&input, 200, 31).unwrap();
    assert_eq!(samples.len(), 200);
    for sample in &samples {
        for i in 0..3 {
            assert_eq!(sample.counts[(i, i)], 0.0);
            assert_eq!(sample.time_together[(i, i)], 0.0);
        }
        assert!(sample.time_together.iter().all(|&t| (0.0..=1.0).contains(&t)));
    }

    let mean = expected_matrices(&samples, 3, Baseline::Mean);
    let median = expected_matrices(&samples, 3, Baseline::Median);
    for i in 0..3 {
        for j in 0..3 {
            assert!(mean.counts[(i, j)] >= 0.0);
            assert!(median.counts[(i, j)] >= 0.0);
        }
    }
    // z has a single interval: it can lead at most once per resample.
    assert!(mean.counts[(2, 0)] <= 1.0);
}

#[test]
fn different_seeds_give_different_distributions() {
    let subjects = vec!["x".to_string(), "y".to_string()];
    let intervals = vec![
        subject(&[(0.0, 300.0), (1000.0, 1400.0)]),
        subject(&[(100.0, 500.0), (1100.0, 1600.0)]),
    ];
    let input = NullModelInput {
        subjects: &subjects,
        intervals: &intervals,
        keys: &[K],
        duration: 3600.0,
        max_restarts: 1_000,
    };
    let a = null_distribution(&input, 100, 1).unwrap();
    let b = null_distribution(&input, 100, 2).unwrap();
    assert_ne!(a, b);
}
