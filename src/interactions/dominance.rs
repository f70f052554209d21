//! Tube dominance (push-out) detection.
//!
//! Subject A enters a pipe, is turned back while subject B sits at the far
//! end, and ends up somewhere new. Each candidate window goes through four
//! filters:
//!
//! 1. topology: the opening step must not be a walk across a chamber
//! 2. contemporaneity: B must be registered strictly inside the window
//! 3. co-location: A and B must share at least one antenna around the window
//! 4. blocking: B occupies the pipe end opposite A's start, and B's first
//!    positions do not include A's start (that would be plain following)

use serde::{Deserialize, Serialize};

use crate::intervals::search::bracket;
use crate::intervals::{State, StateSequence};
use crate::stream::AntennaStream;
use crate::topology::Topology;
use crate::types::{AntennaId, Timestamp};

/// One push-out of the displaced subject by the dominant one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominanceEvent {
    /// Start of the window (dominant subject's first state).
    pub window_start: Timestamp,
    /// End of the window (arrival at a new antenna).
    pub window_end: Timestamp,
    /// Antennas the dominant subject visited inside the window.
    pub dominant_path: Vec<AntennaId>,
    /// Bracketed antennas of the displaced subject.
    pub displaced_path: Vec<AntennaId>,
}

/// A candidate window in the dominant subject's state sequence.
struct Window<'a> {
    states: &'a [State],
}

impl Window<'_> {
    fn start(&self) -> Timestamp {
        self.states[0].time
    }

    fn end(&self) -> Timestamp {
        self.states[self.states.len() - 1].time
    }

    fn first_antenna(&self) -> AntennaId {
        self.states[0].antenna
    }

    fn antennas(&self) -> Vec<AntennaId> {
        self.states.iter().map(|s| s.antenna).collect()
    }
}

/// Extend from the pair at `idx` until an antenna not yet in the window
/// appears. Returns the index of that state, or `None` if the sequence ends
/// first.
fn extend_window(states: &[State], idx: usize) -> Option<usize> {
    (idx + 2..states.len()).find(|&j| {
        let antenna = states[j].antenna;
        !states[idx..j].iter().any(|s| s.antenna == antenna)
    })
}

/// Every push-out of `b` by `a` within the window both streams cover.
pub fn push_out_events(
    topology: &Topology,
    a: &AntennaStream,
    b: &AntennaStream,
) -> Vec<DominanceEvent> {
    let states = StateSequence::from_stream(a);
    let states = states.states();
    let mut events = Vec::new();

    let mut idx = 0;
    while idx + 2 < states.len() {
        let (first, second) = (states[idx].antenna, states[idx + 1].antenna);
        if topology.is_chamber_pair(first, second) {
            idx += 1;
            continue;
        }

        let Some(end) = extend_window(states, idx) else {
            break;
        };
        let window = Window {
            states: &states[idx..=end],
        };
        // Resume from the pair that reached the new antenna.
        idx = end - 1;

        if let Some(event) = check_window(topology, &window, b) {
            events.push(event);
        }
    }
    events
}

fn check_window(topology: &Topology, window: &Window<'_>, b: &AntennaStream) -> Option<DominanceEvent> {
    let (t0, t1) = (window.start(), window.end());
    let around = bracket(t0, t1, b.times());
    if around.inside.is_empty() {
        return None;
    }

    let displaced: Vec<AntennaId> = around.indices().map(|i| b.antennas()[i]).collect();
    let dominant = window.antennas();

    if !dominant.iter().any(|a| displaced.contains(a)) {
        return None;
    }

    let start = window.first_antenna();
    let opposite = topology.pipe_opposite(start)?;
    if !displaced.contains(&opposite) {
        return None;
    }
    if displaced.iter().take(2).any(|&a| a == start) {
        return None;
    }

    Some(DominanceEvent {
        window_start: t0,
        window_end: t1,
        dominant_path: dominant,
        displaced_path: displaced,
    })
}

/// Number of push-outs of `b` by `a`.
pub fn dominance_count(topology: &Topology, a: &AntennaStream, b: &AntennaStream) -> usize {
    push_out_events(topology, a, b).len()
}
