//! Error type shared by every engine entry point.

use thiserror::Error;

use crate::types::{AntennaId, DirectionKey};

/// Errors reported by the interaction engine.
///
/// Degenerate inputs (no transitions, no overlapping intervals, no
/// contemporaneous readings) are never errors; they yield zero-valued results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Antenna and timestamp sequences differ in length.
    #[error("antenna/timestamp length mismatch: {antennas} antennas vs {times} timestamps")]
    LengthMismatch {
        /// Number of antenna ids supplied.
        antennas: usize,
        /// Number of timestamps supplied.
        times: usize,
    },

    /// Timestamps go backwards inside one stream.
    #[error("timestamps decrease at index {index}: {previous} > {current}")]
    UnorderedTimestamps {
        /// Index of the offending reading.
        index: usize,
        /// Timestamp of the preceding reading.
        previous: f64,
        /// Timestamp of the offending reading.
        current: f64,
    },

    /// A window whose end does not come after its start.
    #[error("invalid window [{start}, {end}): end must be after start")]
    InvalidWindow {
        /// Window start.
        start: f64,
        /// Window end.
        end: f64,
    },

    /// A reading refers to an antenna the topology does not know.
    #[error("antenna {antenna} is not part of the topology")]
    UnknownAntenna {
        /// The unknown antenna id.
        antenna: AntennaId,
    },

    /// An opposite-antenna map is not a fixed-point-free involution.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// The reading source has no data for a subject.
    #[error("unknown subject {0:?}")]
    UnknownSubject(String),

    /// The durations to place cannot fit in the phase at all.
    #[error("durations sum to {total}, which exceeds the phase duration {phase}")]
    DurationsExceedPhase {
        /// Sum of the durations to place.
        total: f64,
        /// Phase duration available.
        phase: f64,
    },

    /// Random placement kept failing until the restart budget ran out.
    #[error("interval packing exhausted after {restarts} restarts ({intervals} intervals in {phase})")]
    PackingExhausted {
        /// Restarts performed before giving up.
        restarts: usize,
        /// Number of intervals that had to be placed.
        intervals: usize,
        /// Phase duration available.
        phase: f64,
    },

    /// A placement failure annotated with the subject and direction it came from.
    #[error("resampling {subject} in direction {direction}: {source}")]
    Resampling {
        /// Subject whose intervals were being resampled.
        subject: String,
        /// Direction key being resampled.
        direction: DirectionKey,
        /// Underlying placement error.
        #[source]
        source: Box<EngineError>,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
