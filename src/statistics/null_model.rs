//! Null distribution of following by interval re-placement.
//!
//! Each iteration re-places every subject's intervals for every direction key
//! at random (durations preserved) and recomputes the following matrices on
//! the synthetic intervals. Iterations are independent: iteration `i` draws
//! from its own generator seeded with `counter_rng_seed(seed, i)`, so the
//! parallel and serial paths give identical results.

use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::bootstrap::{counter_rng_seed, resample_intervals};
use super::quantile::Baseline;
use crate::error::{EngineError, Result};
use crate::interactions::{following_matrices, FollowingMatrices};
use crate::intervals::{DirectionIntervals, MotionIntervals};
use crate::types::DirectionKey;

/// Everything one null-model run needs.
#[derive(Debug, Clone, Copy)]
pub struct NullModelInput<'a> {
    /// Subject names, aligned with `intervals`.
    pub subjects: &'a [String],
    /// Observed intervals per subject.
    pub intervals: &'a [MotionIntervals],
    /// Direction keys resampled and matched.
    pub keys: &'a [DirectionKey],
    /// Window duration in seconds.
    pub duration: f64,
    /// Restart bound for each placement.
    pub max_restarts: usize,
}

fn annotate(subject: &str, direction: DirectionKey, err: EngineError) -> EngineError {
    EngineError::Resampling {
        subject: subject.to_string(),
        direction,
        source: Box::new(err),
    }
}

/// Check every subject/direction demand fits the window before any placement.
pub fn check_capacity(input: &NullModelInput<'_>) -> Result<()> {
    for (subject, intervals) in input.subjects.iter().zip(input.intervals) {
        for key in input.keys {
            let Some(observed) = intervals.get(key) else {
                continue;
            };
            let total = observed.total_duration();
            if total > input.duration {
                return Err(annotate(
                    subject,
                    *key,
                    EngineError::DurationsExceedPhase {
                        total,
                        phase: input.duration,
                    },
                ));
            }
        }
    }
    Ok(())
}

/// Re-place one subject's intervals for every key.
pub fn resample_subject<R: Rng>(
    subject: &str,
    intervals: &MotionIntervals,
    keys: &[DirectionKey],
    duration: f64,
    max_restarts: usize,
    rng: &mut R,
) -> Result<MotionIntervals> {
    let mut out = MotionIntervals::default();
    for key in keys {
        let Some(observed) = intervals.get(key) else {
            continue;
        };
        let placement = resample_intervals(&observed.durations(), duration, max_restarts, rng)
            .map_err(|err| annotate(subject, *key, err))?;
        out.insert(*key, DirectionIntervals::new(placement.starts, placement.ends));
    }
    Ok(out)
}

/// One null iteration.
fn run_iteration(input: &NullModelInput<'_>, seed: u64, iteration: usize) -> Result<FollowingMatrices> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, iteration as u64));
    let synthetic = input
        .subjects
        .iter()
        .zip(input.intervals)
        .map(|(subject, intervals)| {
            resample_subject(
                subject,
                intervals,
                input.keys,
                input.duration,
                input.max_restarts,
                &mut rng,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(following_matrices(&synthetic, input.keys, input.duration))
}

/// Run `resamples` null iterations.
///
/// Results are in iteration order regardless of scheduling.
pub fn null_distribution(
    input: &NullModelInput<'_>,
    resamples: usize,
    seed: u64,
) -> Result<Vec<FollowingMatrices>> {
    check_capacity(input)?;

    #[cfg(feature = "parallel")]
    let samples = crate::thread_pool::install(|| {
        (0..resamples)
            .into_par_iter()
            .map(|i| run_iteration(input, seed, i))
            .collect::<Result<Vec<_>>>()
    });

    #[cfg(not(feature = "parallel"))]
    let samples = crate::thread_pool::install(|| {
        (0..resamples)
            .map(|i| run_iteration(input, seed, i))
            .collect::<Result<Vec<_>>>()
    });

    samples
}

/// Per-pair values of one matrix across all samples.
pub fn pair_values<F>(samples: &[FollowingMatrices], i: usize, j: usize, pick: F) -> Vec<f64>
where
    F: Fn(&FollowingMatrices) -> &DMatrix<f64>,
{
    samples.iter().map(|s| pick(s)[(i, j)]).collect()
}

/// Collapse a null distribution to expected matrices for `n` subjects.
///
/// An empty distribution yields zero matrices.
pub fn expected_matrices(samples: &[FollowingMatrices], n: usize, baseline: Baseline) -> FollowingMatrices {
    let mut out = FollowingMatrices::zeros(n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            out.counts[(i, j)] = baseline.summarize(&pair_values(samples, i, j, |s| &s.counts));
            out.time_together[(i, j)] =
                baseline.summarize(&pair_values(samples, i, j, |s| &s.time_together));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: DirectionKey = DirectionKey::new(1, 2);

    fn subject(pairs: &[(f64, f64)]) -> MotionIntervals {
        let (starts, ends) = pairs.iter().copied().unzip();
        let mut m = MotionIntervals::default();
        m.insert(K, DirectionIntervals::new(starts, ends));
        m
    }

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_resample_subject_preserves_durations() {
        let observed = subject(&[(0.0, 10.0), (50.0, 70.0), (100.0, 130.0)]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let synthetic = resample_subject("a", &observed, &[K, K.reversed()], 3600.0, 100, &mut rng).unwrap();
        let mut durations = synthetic.get(&K).unwrap().durations();
        durations.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(durations.len(), 3);
        for (got, want) in durations.iter().zip([10.0, 20.0, 30.0]) {
            assert!((got - want).abs() < 1e-9);
        }
        assert!(synthetic.get(&K.reversed()).is_none());
    }

    #[test]
    fn test_capacity_error_names_subject_and_direction() {
        let subjects = names();
        let intervals = [subject(&[(0.0, 5.0)]), subject(&[(0.0, 50.0)])];
        let input = NullModelInput {
            subjects: &subjects,
            intervals: &intervals,
            keys: &[K],
            duration: 20.0,
            max_restarts: 10,
        };
        match null_distribution(&input, 10, 1).unwrap_err() {
            EngineError::Resampling { subject, direction, source } => {
                assert_eq!(subject, "b");
                assert_eq!(direction, K);
                assert!(matches!(*source, EngineError::DurationsExceedPhase { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_distribution_is_reproducible() {
        let subjects = names();
        let intervals = [
            subject(&[(0.0, 40.0), (100.0, 130.0), (300.0, 360.0)]),
            subject(&[(10.0, 60.0), (120.0, 150.0), (310.0, 400.0)]),
        ];
        let input = NullModelInput {
            subjects: &subjects,
            intervals: &intervals,
            keys: &[K],
            duration: 600.0,
            max_restarts: 1000,
        };
        let first = null_distribution(&input, 50, 7).unwrap();
        let second = null_distribution(&input, 50, 7).unwrap();
        assert_eq!(first.len(), 50);
        assert_eq!(first, second);
        for sample in &first {
            assert_eq!(sample.counts[(0, 0)], 0.0);
            assert!(sample.counts.iter().all(|&c| c >= 0.0));
        }
    }

    #[test]
    fn test_expected_matrices() {
        let mut a = FollowingMatrices::zeros(2);
        let mut b = FollowingMatrices::zeros(2);
        let mut c = FollowingMatrices::zeros(2);
        a.counts[(0, 1)] = 1.0;
        b.counts[(0, 1)] = 2.0;
        c.counts[(0, 1)] = 6.0;
        let samples = [a, b, c];
        assert_eq!(expected_matrices(&samples, 2, Baseline::Mean).counts[(0, 1)], 3.0);
        assert_eq!(expected_matrices(&samples, 2, Baseline::Median).counts[(0, 1)], 2.0);
        assert_eq!(expected_matrices(&[], 2, Baseline::Mean), FollowingMatrices::zeros(2));
    }
}
