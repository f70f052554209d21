//! Per-subject antenna streams and the sources that supply them.
//!
//! The engine never reads files itself. It asks a [`ReadingSource`] for a
//! subject's readings inside one phase and receives an [`AntennaStream`]:
//! two parallel, time-ordered sequences of antenna ids and timestamps.

mod memory;

pub use memory::ReadingLog;

use crate::error::{EngineError, Result};
use crate::types::{AntennaId, Phase, Timestamp};

/// Supplies a subject's readings restricted to a phase.
pub trait ReadingSource {
    /// Readings of `subject` with timestamps in `[phase.start, phase.end)`.
    ///
    /// An unknown subject is an error; a known subject without readings in
    /// the phase yields an empty stream.
    fn stream(&self, subject: &str, phase: &Phase) -> Result<AntennaStream>;
}

/// Validated parallel antenna/timestamp sequences for one subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntennaStream {
    antennas: Vec<AntennaId>,
    times: Vec<Timestamp>,
}

impl AntennaStream {
    /// Build a stream, failing on length mismatch or decreasing timestamps.
    pub fn new(antennas: Vec<AntennaId>, times: Vec<Timestamp>) -> Result<Self> {
        if antennas.len() != times.len() {
            return Err(EngineError::LengthMismatch {
                antennas: antennas.len(),
                times: times.len(),
            });
        }
        if let Some(index) = times.windows(2).position(|w| !(w[0] <= w[1])) {
            return Err(EngineError::UnorderedTimestamps {
                index: index + 1,
                previous: times[index],
                current: times[index + 1],
            });
        }
        Ok(Self { antennas, times })
    }

    /// Build a stream from `(antenna, time)` pairs.
    pub fn from_pairs(pairs: &[(AntennaId, Timestamp)]) -> Result<Self> {
        let (antennas, times) = pairs.iter().copied().unzip();
        Self::new(antennas, times)
    }

    /// Antenna ids in time order.
    pub fn antennas(&self) -> &[AntennaId] {
        &self.antennas
    }

    /// Timestamps, non-decreasing.
    pub fn times(&self) -> &[Timestamp] {
        &self.times
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.antennas.len()
    }

    /// Whether the stream has no readings.
    pub fn is_empty(&self) -> bool {
        self.antennas.is_empty()
    }

    /// Time of the first and last reading.
    pub fn span(&self) -> Option<(Timestamp, Timestamp)> {
        Some((*self.times.first()?, *self.times.last()?))
    }
}
