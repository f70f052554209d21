//! Type aliases and common value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Antenna identifier (small positive integer).
pub type AntennaId = u8;

/// Timestamp in seconds.
pub type Timestamp = f64;

/// Ordered antenna pair identifying a traversal type, e.g. `1 -> 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectionKey {
    /// Antenna the subject left.
    pub from: AntennaId,
    /// Antenna the subject reached.
    pub to: AntennaId,
}

impl DirectionKey {
    /// Create a key for a traversal from `from` to `to`.
    pub const fn new(from: AntennaId, to: AntennaId) -> Self {
        Self { from, to }
    }

    /// The same corridor traversed the other way.
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for DirectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// One antenna detection of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Subject (tag) identifier.
    pub subject: String,
    /// Antenna that registered the subject.
    pub antenna: AntennaId,
    /// Detection time in seconds.
    pub time: Timestamp,
}

impl Reading {
    /// Build a reading.
    pub fn new(subject: impl Into<String>, antenna: AntennaId, time: Timestamp) -> Self {
        Self {
            subject: subject.into(),
            antenna,
            time,
        }
    }
}

/// Named half-open time window `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase label, e.g. `"1 dark"`.
    pub name: String,
    /// Inclusive start.
    pub start: Timestamp,
    /// Exclusive end.
    pub end: Timestamp,
}

impl Phase {
    /// Create a phase, rejecting windows whose end is not after their start.
    pub fn new(name: impl Into<String>, start: Timestamp, end: Timestamp) -> Result<Self> {
        if !(end > start) {
            return Err(EngineError::InvalidWindow { start, end });
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
        })
    }

    /// Length of the phase in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` falls inside `[start, end)`.
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t < self.end
    }

    /// Split the phase into consecutive bins of `binsize` seconds.
    ///
    /// The last bin is truncated at the phase end. Bins are named
    /// `"<phase> <offset in hours>h"`.
    pub fn bins(&self, binsize: f64) -> Result<Vec<Phase>> {
        if !(binsize > 0.0) || !binsize.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "bin size must be positive, got {binsize}"
            )));
        }
        let mut bins = Vec::new();
        let mut start = self.start;
        while start < self.end {
            let end = (start + binsize).min(self.end);
            let offset_h = (start - self.start) / 3600.0;
            bins.push(Phase {
                name: format!("{} {:.2}h", self.name, offset_h),
                start,
                end,
            });
            start = end;
        }
        Ok(bins)
    }
}
