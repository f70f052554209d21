//! Random re-placement of motion intervals.
//!
//! The null model keeps every interval's duration but forgets where it was.
//! Durations are dropped one at a time at uniform random offsets inside the
//! phase, rejecting any placement that would touch or overlap an interval
//! already placed. Long intervals go first since they are the hardest to fit.
//!
//! Each placement round gets a fixed attempt budget; a round that runs out
//! is discarded and started over, and the number of restarts is bounded so a
//! pathological duration set fails loudly instead of spinning.

use rand::Rng;

use crate::constants::ATTEMPTS_PER_INTERVAL;
use crate::error::{EngineError, Result};

/// Counter-based RNG seed generation using SplitMix64.
///
/// Gives every bootstrap iteration its own well-distributed seed derived from
/// one base seed, so iterations can run on any thread in any order and still
/// reproduce exactly.
///
/// # Arguments
///
/// * `base_seed` - Base random seed
/// * `counter` - Iteration counter (0, 1, 2, ...)
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    // SplitMix64: https://xoshiro.di.unimi.it/splitmix64.c
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Synthetic intervals produced by [`resample_intervals`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Interval starts, increasing.
    pub starts: Vec<f64>,
    /// Interval ends, aligned with `starts`.
    pub ends: Vec<f64>,
    /// Rounds discarded before this placement succeeded.
    pub restarts: usize,
}

impl Placement {
    /// Durations in start order.
    pub fn durations(&self) -> Vec<f64> {
        self.starts
            .iter()
            .zip(&self.ends)
            .map(|(s, e)| e - s)
            .collect()
    }
}

/// Try to insert `[start, start + duration]` into the sorted placement.
///
/// The candidate must end inside the phase and fit strictly between its
/// start-ordered neighbours; any shared boundary counts as a collision.
/// Returns whether the interval was inserted.
fn insert_interval(
    start: f64,
    duration: f64,
    phase: f64,
    starts: &mut Vec<f64>,
    ends: &mut Vec<f64>,
) -> bool {
    let end = start + duration;
    if end > phase {
        return false;
    }

    let pos = starts.partition_point(|&s| s < start);
    if pos > 0 && ends[pos - 1] >= start {
        return false;
    }
    if pos < starts.len() && end >= starts[pos] {
        return false;
    }

    starts.insert(pos, start);
    ends.insert(pos, end);
    true
}

/// One placement round. `None` when the attempt budget runs out.
fn place_round<R: Rng>(durations: &[f64], phase: f64, rng: &mut R) -> Option<(Vec<f64>, Vec<f64>)> {
    let budget = ATTEMPTS_PER_INTERVAL * durations.len();
    let mut starts = Vec::with_capacity(durations.len());
    let mut ends = Vec::with_capacity(durations.len());
    let mut attempts = 0;

    for &duration in durations {
        loop {
            if attempts == budget {
                return None;
            }
            attempts += 1;
            let candidate = rng.random_range(0.0..phase);
            if insert_interval(candidate, duration, phase, &mut starts, &mut ends) {
                break;
            }
        }
    }
    Some((starts, ends))
}

/// Place intervals with the given durations at random inside `[0, phase]`.
///
/// Every start lies in `[0, phase)`, every end is at most `phase`, no two
/// intervals overlap or touch, and the output durations are exactly the input
/// durations (in start order rather than input order).
///
/// # Errors
///
/// - [`EngineError::InvalidConfig`] for a non-positive phase or a negative or
///   non-finite duration
/// - [`EngineError::DurationsExceedPhase`] when the durations cannot fit even
///   when packed end to end; detected before any placement
/// - [`EngineError::PackingExhausted`] when `max_restarts` rounds in a row ran
///   out of attempts
pub fn resample_intervals<R: Rng>(
    durations: &[f64],
    phase: f64,
    max_restarts: usize,
    rng: &mut R,
) -> Result<Placement> {
    if !(phase > 0.0) || !phase.is_finite() {
        return Err(EngineError::InvalidConfig(format!(
            "phase duration must be positive, got {phase}"
        )));
    }
    if let Some(bad) = durations.iter().find(|d| !(**d >= 0.0) || !d.is_finite()) {
        return Err(EngineError::InvalidConfig(format!(
            "interval durations must be finite and non-negative, got {bad}"
        )));
    }
    let total: f64 = durations.iter().sum();
    if total > phase {
        return Err(EngineError::DurationsExceedPhase { total, phase });
    }
    if durations.is_empty() {
        return Ok(Placement::default());
    }

    let mut sorted = durations.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut restarts = 0;
    loop {
        if let Some((starts, ends)) = place_round(&sorted, phase, rng) {
            if restarts > 0 {
                log::trace!(
                    "placed {} intervals in {:.1}s after {} restarts",
                    sorted.len(),
                    phase,
                    restarts
                );
            }
            return Ok(Placement {
                starts,
                ends,
                restarts,
            });
        }
        if restarts == max_restarts {
            return Err(EngineError::PackingExhausted {
                restarts,
                intervals: sorted.len(),
                phase,
            });
        }
        restarts += 1;
    }
}
