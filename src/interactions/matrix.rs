//! Subject-by-subject interaction matrices.

use nalgebra::DMatrix;

use super::dominance::dominance_count;
use super::following::{following_pair, FollowingSummary};
use crate::intervals::MotionIntervals;
use crate::stream::AntennaStream;
use crate::topology::Topology;
use crate::types::DirectionKey;

/// Following counts and shared time for every ordered pair, `[leader, follower]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowingMatrices {
    /// Number of following episodes.
    pub counts: DMatrix<f64>,
    /// Shared time in the pipe as a fraction of the window duration.
    pub time_together: DMatrix<f64>,
}

impl FollowingMatrices {
    /// All-zero matrices for `n` subjects.
    pub fn zeros(n: usize) -> Self {
        Self {
            counts: DMatrix::zeros(n, n),
            time_together: DMatrix::zeros(n, n),
        }
    }
}

/// Run the matcher for every ordered pair of distinct subjects.
///
/// Calls `visit(leader, follower, &summary)` for each pair, row by row.
pub fn for_each_following_pair<F>(intervals: &[MotionIntervals], keys: &[DirectionKey], mut visit: F)
where
    F: FnMut(usize, usize, &FollowingSummary),
{
    for (i, leader) in intervals.iter().enumerate() {
        for (j, follower) in intervals.iter().enumerate() {
            if i != j {
                visit(i, j, &following_pair(leader, follower, keys));
            }
        }
    }
}

/// Following matrices over one window of `duration` seconds.
pub fn following_matrices(
    intervals: &[MotionIntervals],
    keys: &[DirectionKey],
    duration: f64,
) -> FollowingMatrices {
    let mut out = FollowingMatrices::zeros(intervals.len());
    for_each_following_pair(intervals, keys, |i, j, summary| {
        out.counts[(i, j)] = summary.count as f64;
        out.time_together[(i, j)] = summary.total_time / duration;
    });
    out
}

/// Push-out counts for every ordered pair, `[dominant, displaced]`.
///
/// The diagonal is always zero.
pub fn dominance_matrix(topology: &Topology, streams: &[AntennaStream]) -> DMatrix<f64> {
    let n = streams.len();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            0.0
        } else {
            dominance_count(topology, &streams[i], &streams[j]) as f64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervals::DirectionIntervals;

    const K: DirectionKey = DirectionKey::new(1, 2);

    fn subject(pairs: &[(f64, f64)]) -> MotionIntervals {
        let (starts, ends) = pairs.iter().copied().unzip();
        let mut m = MotionIntervals::default();
        m.insert(K, DirectionIntervals::new(starts, ends));
        m
    }

    #[test]
    fn test_following_matrix_orientation() {
        let subjects = [subject(&[(0.0, 5.0)]), subject(&[(2.0, 8.0)]), MotionIntervals::default()];
        let m = following_matrices(&subjects, &[K], 100.0);
        assert_eq!(m.counts[(0, 1)], 1.0);
        assert_eq!(m.counts[(1, 0)], 0.0);
        assert!((m.time_together[(0, 1)] - 0.03).abs() < 1e-12);
        assert_eq!(m.counts.sum(), 1.0);
        for i in 0..3 {
            assert_eq!(m.counts[(i, i)], 0.0);
        }
    }

    #[test]
    fn test_dominance_matrix_diagonal_is_zero() {
        let topology = Topology::ecohab();
        let a = AntennaStream::from_pairs(&[(1, 0.0), (2, 2.0), (1, 4.0), (8, 6.0)]).unwrap();
        let b = AntennaStream::from_pairs(&[(2, 1.0), (2, 3.0), (2, 8.0)]).unwrap();
        let m = dominance_matrix(&topology, &[a, b]);
        assert_eq!(m[(0, 0)], 0.0);
        assert_eq!(m[(1, 1)], 0.0);
        assert_eq!(m[(0, 1)], 1.0);
        assert_eq!(m[(1, 0)], 0.0);
    }
}
