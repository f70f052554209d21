//! In-memory reading store.

use std::collections::BTreeMap;

use super::{AntennaStream, ReadingSource};
use crate::error::{EngineError, Result};
use crate::types::{AntennaId, Phase, Reading, Timestamp};

/// Readings of a whole experiment, grouped by subject and sorted by time.
#[derive(Debug, Clone, Default)]
pub struct ReadingLog {
    subjects: BTreeMap<String, Vec<(AntennaId, Timestamp)>>,
}

impl ReadingLog {
    /// Group readings by subject.
    ///
    /// Readings of each subject are sorted by timestamp with a stable sort, so
    /// simultaneous readings keep their input order. Non-finite timestamps are
    /// rejected.
    pub fn from_readings(readings: impl IntoIterator<Item = Reading>) -> Result<Self> {
        let mut subjects: BTreeMap<String, Vec<(AntennaId, Timestamp)>> = BTreeMap::new();
        for reading in readings {
            if !reading.time.is_finite() {
                return Err(EngineError::InvalidWindow {
                    start: reading.time,
                    end: reading.time,
                });
            }
            subjects
                .entry(reading.subject)
                .or_default()
                .push((reading.antenna, reading.time));
        }
        for readings in subjects.values_mut() {
            readings.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        Ok(Self { subjects })
    }

    /// Subject identifiers in sorted order.
    pub fn subjects(&self) -> Vec<String> {
        self.subjects.keys().cloned().collect()
    }

    /// Total number of readings.
    pub fn len(&self) -> usize {
        self.subjects.values().map(Vec::len).sum()
    }

    /// Whether the log holds no readings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReadingSource for ReadingLog {
    fn stream(&self, subject: &str, phase: &Phase) -> Result<AntennaStream> {
        let readings = self
            .subjects
            .get(subject)
            .ok_or_else(|| EngineError::UnknownSubject(subject.to_string()))?;

        let lo = readings.partition_point(|r| r.1 < phase.start);
        let hi = readings.partition_point(|r| r.1 < phase.end);
        let (antennas, times) = readings[lo..hi].iter().copied().unzip();
        AntennaStream::new(antennas, times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> ReadingLog {
        ReadingLog::from_readings(vec![
            Reading::new("b", 2, 3.0),
            Reading::new("a", 2, 5.0),
            Reading::new("a", 1, 0.0),
            Reading::new("a", 1, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_groups_and_sorts_by_subject() {
        let log = log();
        assert_eq!(log.subjects(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(log.len(), 4);

        let phase = Phase::new("all", 0.0, 100.0).unwrap();
        let stream = log.stream("a", &phase).unwrap();
        assert_eq!(stream.antennas(), &[1, 2, 1]);
        assert_eq!(stream.times(), &[0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_phase_slicing_is_half_open() {
        let phase = Phase::new("early", 0.0, 10.0).unwrap();
        let stream = log().stream("a", &phase).unwrap();
        assert_eq!(stream.times(), &[0.0, 5.0]);
    }

    #[test]
    fn test_unknown_subject() {
        let phase = Phase::new("all", 0.0, 1.0).unwrap();
        let err = log().stream("zz", &phase).unwrap_err();
        assert_eq!(err, EngineError::UnknownSubject("zz".to_string()));
    }

    #[test]
    fn test_subject_without_readings_in_phase() {
        let phase = Phase::new("late", 50.0, 60.0).unwrap();
        assert!(log().stream("b", &phase).unwrap().is_empty());
    }
}
