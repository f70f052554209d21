//! State-change reduction.
//!
//! A subject sitting at one antenna is registered repeatedly. Only the
//! readings where the antenna changes carry information about movement.

use serde::{Deserialize, Serialize};

use crate::stream::AntennaStream;
use crate::types::{AntennaId, Timestamp};

/// Indices `i` with `antennas[i] != antennas[i - 1]`; index 0 is always kept.
pub fn change_indices(antennas: &[AntennaId]) -> Vec<usize> {
    if antennas.is_empty() {
        return Vec::new();
    }
    std::iter::once(0)
        .chain((1..antennas.len()).filter(|&i| antennas[i] != antennas[i - 1]))
        .collect()
}

/// One entry of a reduced sequence: the subject arrived at `antenna` at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Antenna reached.
    pub antenna: AntennaId,
    /// Time of the first reading at this antenna.
    pub time: Timestamp,
}

/// A subject's antenna changes over one window.
///
/// No two consecutive states share an antenna. The raw span of the stream the
/// sequence was reduced from is kept alongside, since trailing repeats are
/// dropped by the reduction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSequence {
    states: Vec<State>,
    span: Option<(Timestamp, Timestamp)>,
}

impl StateSequence {
    /// Reduce a stream to its antenna changes.
    pub fn from_stream(stream: &AntennaStream) -> Self {
        let antennas = stream.antennas();
        let times = stream.times();
        let states = change_indices(antennas)
            .into_iter()
            .map(|i| State {
                antenna: antennas[i],
                time: times[i],
            })
            .collect();
        Self {
            states,
            span: stream.span(),
        }
    }

    /// The reduced states in time order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no reading was reduced.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// First and last timestamp of the raw stream.
    pub fn span(&self) -> Option<(Timestamp, Timestamp)> {
        self.span
    }

    /// Number of transitions (one fewer than states).
    pub fn transitions(&self) -> usize {
        self.states.len().saturating_sub(1)
    }
}
