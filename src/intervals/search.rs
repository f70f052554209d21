//! Ordered search over sorted timestamps.
//!
//! Both the following matcher and the dominance detector bracket a window
//! `[t0, t1]` against another subject's sorted timestamps. They share this
//! primitive so the boundary rules are identical everywhere:
//!
//! - `before`: the last index with `time <= t0`
//! - `inside`: every index with `t0 < time < t1`
//! - `after`: the first index with `time >= t1`
//!
//! Missing neighbours are `None`, never a sentinel index.

use std::ops::Range;

use crate::types::Timestamp;

/// Positions of a window's neighbours inside a sorted timestamp slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    /// Nearest index at or before the window start.
    pub before: Option<usize>,
    /// Indices strictly inside the window.
    pub inside: Range<usize>,
    /// Nearest index at or after the window end.
    pub after: Option<usize>,
}

impl Bracket {
    /// Indices in order: `before`, then `inside`, then `after`.
    ///
    /// When the window is empty (`t0 == t1`) `before` and `after` may name the
    /// same reading; it is yielded once.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        let after = match (self.before, self.after) {
            (Some(b), Some(a)) if a <= b => None,
            (_, a) => a,
        };
        self.before
            .into_iter()
            .chain(self.inside.clone())
            .chain(after)
    }
}

/// Last index with `times[i] <= t`.
pub fn idx_at_or_before(t: Timestamp, times: &[Timestamp]) -> Option<usize> {
    times.partition_point(|&x| x <= t).checked_sub(1)
}

/// First index with `times[i] >= t`.
pub fn idx_at_or_after(t: Timestamp, times: &[Timestamp]) -> Option<usize> {
    let idx = times.partition_point(|&x| x < t);
    (idx < times.len()).then_some(idx)
}

/// Indices with `t0 < times[i] < t1`.
pub fn idx_strictly_between(t0: Timestamp, t1: Timestamp, times: &[Timestamp]) -> Range<usize> {
    let lo = times.partition_point(|&x| x <= t0);
    let hi = times.partition_point(|&x| x < t1).max(lo);
    lo..hi
}

/// Bracket the window `[t0, t1]` against sorted `times`.
pub fn bracket(t0: Timestamp, t1: Timestamp, times: &[Timestamp]) -> Bracket {
    Bracket {
        before: idx_at_or_before(t0, times),
        inside: idx_strictly_between(t0, t1, times),
        after: idx_at_or_after(t1, times),
    }
}
