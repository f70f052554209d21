//! Directed motion intervals.

use std::collections::BTreeMap;

use super::reduce::StateSequence;
use crate::types::{DirectionKey, Timestamp};

/// Time a subject spent moving from one antenna to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionInterval {
    /// Antenna pair traversed.
    pub direction: DirectionKey,
    /// Arrival at the source antenna.
    pub start: Timestamp,
    /// Arrival at the target antenna.
    pub end: Timestamp,
}

impl MotionInterval {
    /// Length of the interval.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One interval per adjacent pair of states, in time order.
pub fn motion_intervals(states: &StateSequence) -> Vec<MotionInterval> {
    states
        .states()
        .windows(2)
        .map(|w| MotionInterval {
            direction: DirectionKey::new(w[0].antenna, w[1].antenna),
            start: w[0].time,
            end: w[1].time,
        })
        .collect()
}

/// Parallel start/end lists for one direction, sorted by start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionIntervals {
    /// Interval starts, non-decreasing.
    pub starts: Vec<Timestamp>,
    /// Interval ends, aligned with `starts`.
    pub ends: Vec<Timestamp>,
}

impl DirectionIntervals {
    /// Build from parallel lists, sorting stably by start.
    pub fn new(starts: Vec<Timestamp>, ends: Vec<Timestamp>) -> Self {
        debug_assert_eq!(starts.len(), ends.len());
        let mut pairs: Vec<_> = starts.into_iter().zip(ends).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (starts, ends) = pairs.into_iter().unzip();
        Self { starts, ends }
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Whether there are no intervals.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Interval durations in start order.
    pub fn durations(&self) -> Vec<f64> {
        self.starts
            .iter()
            .zip(&self.ends)
            .map(|(s, e)| e - s)
            .collect()
    }

    /// Sum of all durations.
    pub fn total_duration(&self) -> f64 {
        self.durations().iter().sum()
    }
}

/// A subject's motion intervals grouped by direction key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionIntervals {
    by_direction: BTreeMap<DirectionKey, DirectionIntervals>,
}

impl MotionIntervals {
    /// Group intervals by direction, preserving time order inside each group.
    pub fn from_intervals(intervals: &[MotionInterval]) -> Self {
        let mut by_direction: BTreeMap<DirectionKey, DirectionIntervals> = BTreeMap::new();
        for interval in intervals {
            let entry = by_direction.entry(interval.direction).or_default();
            entry.starts.push(interval.start);
            entry.ends.push(interval.end);
        }
        // Input is time ordered already; this only guards the invariant.
        for entry in by_direction.values_mut() {
            *entry = DirectionIntervals::new(
                std::mem::take(&mut entry.starts),
                std::mem::take(&mut entry.ends),
            );
        }
        Self { by_direction }
    }

    /// Reduce-and-extract in one step.
    pub fn from_states(states: &StateSequence) -> Self {
        Self::from_intervals(&motion_intervals(states))
    }

    /// Intervals for `key`, if the subject ever traversed it.
    pub fn get(&self, key: &DirectionKey) -> Option<&DirectionIntervals> {
        self.by_direction.get(key)
    }

    /// Replace the intervals of one direction.
    pub fn insert(&mut self, key: DirectionKey, intervals: DirectionIntervals) {
        self.by_direction.insert(key, intervals);
    }

    /// Direction keys present, in order.
    pub fn directions(&self) -> impl Iterator<Item = &DirectionKey> {
        self.by_direction.keys()
    }

    /// Iterate over `(key, intervals)`.
    pub fn iter(&self) -> impl Iterator<Item = (&DirectionKey, &DirectionIntervals)> {
        self.by_direction.iter()
    }

    /// Number of intervals over the given keys.
    pub fn count(&self, keys: &[DirectionKey]) -> usize {
        keys.iter()
            .filter_map(|k| self.by_direction.get(k))
            .map(DirectionIntervals::len)
            .sum()
    }
}
