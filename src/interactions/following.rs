//! Following detection.
//!
//! Subject B follows subject A through a corridor segment when B starts the
//! same traversal while A is still inside it and finishes after A has left.

use serde::{Deserialize, Serialize};

use crate::intervals::search::idx_strictly_between;
use crate::intervals::{DirectionIntervals, MotionIntervals};
use crate::types::{DirectionKey, Timestamp};

/// One following episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowingEvent {
    /// Traversal both subjects made.
    pub direction: DirectionKey,
    /// Leader's interval start.
    pub lead_start: Timestamp,
    /// Leader's interval end.
    pub lead_end: Timestamp,
    /// Follower's interval start (strictly inside the leader's interval).
    pub follow_start: Timestamp,
    /// Follower's interval end (after the leader's end).
    pub follow_end: Timestamp,
}

impl FollowingEvent {
    /// Time both subjects were in the segment together.
    pub fn overlap(&self) -> f64 {
        self.lead_end - self.follow_start
    }

    /// Length of the whole episode, from the leader entering to the follower leaving.
    pub fn span(&self) -> f64 {
        self.follow_end - self.lead_start
    }

    /// Delay between the leader and the follower entering.
    pub fn lag(&self) -> f64 {
        self.follow_start - self.lead_start
    }
}

/// Following statistics for one ordered pair of subjects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowingSummary {
    /// Number of following episodes.
    pub count: usize,
    /// Summed overlap of all episodes.
    pub total_time: f64,
    /// Episode spans, in direction-key then time order.
    pub spans: Vec<f64>,
}

impl FollowingSummary {
    /// Summarize a list of events.
    pub fn from_events(events: &[FollowingEvent]) -> Self {
        Self {
            count: events.len(),
            total_time: events.iter().map(FollowingEvent::overlap).sum(),
            spans: events.iter().map(FollowingEvent::span).collect(),
        }
    }
}

/// Match the leader's intervals against the follower's within one direction.
///
/// For every leader interval `[s1, e1]`, the follower's intervals starting in
/// `(s1, e1)` are scanned in start order; the first one ending after `e1`
/// credits one episode. Each leader interval is credited at most once.
pub fn following_single_direction(
    direction: DirectionKey,
    leader: &DirectionIntervals,
    follower: &DirectionIntervals,
) -> Vec<FollowingEvent> {
    let mut events = Vec::new();
    if leader.is_empty() || follower.is_empty() {
        return events;
    }

    for (&s1, &e1) in leader.starts.iter().zip(&leader.ends) {
        let candidates = idx_strictly_between(s1, e1, &follower.starts);
        if let Some(idx) = candidates.into_iter().find(|&i| follower.ends[i] > e1) {
            events.push(FollowingEvent {
                direction,
                lead_start: s1,
                lead_end: e1,
                follow_start: follower.starts[idx],
                follow_end: follower.ends[idx],
            });
        }
    }
    events
}

/// All following episodes of `follower` behind `leader` over `keys`.
///
/// Directions missing for either subject contribute nothing.
pub fn following_events(
    leader: &MotionIntervals,
    follower: &MotionIntervals,
    keys: &[DirectionKey],
) -> Vec<FollowingEvent> {
    keys.iter()
        .filter_map(|key| Some((key, leader.get(key)?, follower.get(key)?)))
        .flat_map(|(key, l, f)| following_single_direction(*key, l, f))
        .collect()
}

/// Summary of [`following_events`].
pub fn following_pair(
    leader: &MotionIntervals,
    follower: &MotionIntervals,
    keys: &[DirectionKey],
) -> FollowingSummary {
    FollowingSummary::from_events(&following_events(leader, follower, keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervals::StateSequence;
    use crate::stream::AntennaStream;

    const K: DirectionKey = DirectionKey::new(1, 2);

    fn dir(pairs: &[(f64, f64)]) -> DirectionIntervals {
        let (starts, ends) = pairs.iter().copied().unzip();
        DirectionIntervals::new(starts, ends)
    }

    #[test]
    fn test_trailing_interval_is_a_following() {
        let a = dir(&[(0.0, 5.0)]);
        let b = dir(&[(2.0, 8.0)]);
        let events = following_single_direction(K, &a, &b);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].overlap(), 3.0);
        assert_eq!(events[0].span(), 8.0);
        assert_eq!(events[0].lag(), 2.0);
    }

    #[test]
    fn test_follower_leaving_first_is_not_following() {
        let a = dir(&[(0.0, 5.0)]);
        let b = dir(&[(2.0, 4.0), (2.5, 5.0)]);
        assert!(following_single_direction(K, &a, &b).is_empty());
    }

    #[test]
    fn test_start_ties_do_not_match() {
        let a = dir(&[(0.0, 5.0)]);
        assert!(following_single_direction(K, &a, &dir(&[(0.0, 9.0)])).is_empty());
        assert!(following_single_direction(K, &a, &dir(&[(5.0, 9.0)])).is_empty());
    }

    #[test]
    fn test_one_credit_per_leader_interval() {
        let a = dir(&[(0.0, 5.0)]);
        let b = dir(&[(1.0, 6.0), (2.0, 7.0)]);
        let events = following_single_direction(K, &a, &b);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].follow_start, 1.0);
    }

    #[test]
    fn test_first_qualifying_candidate_wins() {
        let a = dir(&[(0.0, 5.0)]);
        let b = dir(&[(1.0, 3.0), (2.0, 7.0), (3.0, 9.0)]);
        let events = following_single_direction(K, &a, &b);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].follow_end, 7.0);
    }

    #[test]
    fn test_following_is_asymmetric() {
        let a = dir(&[(0.0, 5.0)]);
        let b = dir(&[(2.0, 8.0)]);
        assert_eq!(following_single_direction(K, &a, &b).len(), 1);
        assert_eq!(following_single_direction(K, &b, &a).len(), 0);
    }

    #[test]
    fn test_scenario_single_reading_follower() {
        // Leader 1 -> 2 over [0, 5]; follower only seen once at antenna 2.
        let leader = StateSequence::from_stream(
            &AntennaStream::from_pairs(&[(1, 0.0), (2, 5.0), (1, 5.0), (1, 9.0)]).unwrap(),
        );
        let follower = StateSequence::from_stream(&AntennaStream::from_pairs(&[(2, 3.0)]).unwrap());
        let summary = following_pair(
            &MotionIntervals::from_states(&leader),
            &MotionIntervals::from_states(&follower),
            &[K],
        );
        assert_eq!(summary, FollowingSummary::default());
    }

    #[test]
    fn test_sums_over_keys_and_ignores_missing_ones() {
        let mut leader = MotionIntervals::default();
        let mut follower = MotionIntervals::default();
        let back = K.reversed();
        leader.insert(K, dir(&[(0.0, 5.0), (20.0, 24.0)]));
        leader.insert(back, dir(&[(10.0, 12.0)]));
        follower.insert(K, dir(&[(21.0, 25.0)]));
        follower.insert(back, dir(&[(11.0, 13.0)]));

        let summary = following_pair(&leader, &follower, &[K, back, DirectionKey::new(3, 4)]);
        assert_eq!(summary.count, 2);
        assert!((summary.total_time - 4.0).abs() < 1e-12);
        assert_eq!(summary.spans, vec![5.0, 3.0]);
    }

    #[test]
    fn test_matching_is_idempotent() {
        let a = dir(&[(0.0, 5.0), (6.0, 9.0), (10.0, 30.0)]);
        let b = dir(&[(1.0, 6.0), (7.0, 8.0), (11.0, 31.0)]);
        let first = following_single_direction(K, &a, &b);
        let second = following_single_direction(K, &a, &b);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
