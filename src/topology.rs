//! Apparatus wiring: which antenna sits opposite which.
//!
//! Every antenna is one end of a pipe and one entrance of a chamber. The
//! topology stores both relations as fixed-point-free involutions and is
//! injected into the engine at construction time, so different apparatus
//! layouts can be analyzed side by side.

use std::collections::BTreeMap;

use crate::constants::{ECOHAB_CHAMBER_PAIRS, ECOHAB_PIPE_PAIRS};
use crate::error::{EngineError, Result};
use crate::types::{AntennaId, DirectionKey};

/// Immutable antenna topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pipe_opposite: BTreeMap<AntennaId, AntennaId>,
    chamber_opposite: BTreeMap<AntennaId, AntennaId>,
}

impl Topology {
    /// Build a topology from unordered antenna pairs.
    ///
    /// `pipes` lists the two ends of each pipe, `chambers` the two entrances of
    /// each chamber. Both must pair up the same antenna set, with every antenna
    /// appearing exactly once per relation.
    pub fn from_pairs(
        pipes: &[(AntennaId, AntennaId)],
        chambers: &[(AntennaId, AntennaId)],
    ) -> Result<Self> {
        let pipe_opposite = involution("pipe", pipes)?;
        let chamber_opposite = involution("chamber", chambers)?;

        if !pipe_opposite.keys().eq(chamber_opposite.keys()) {
            return Err(EngineError::InvalidTopology(
                "pipe and chamber maps cover different antennas".to_string(),
            ));
        }

        Ok(Self {
            pipe_opposite,
            chamber_opposite,
        })
    }

    /// The standard eight-antenna, four-chamber ring.
    pub fn ecohab() -> Self {
        Self {
            pipe_opposite: mirror(ECOHAB_PIPE_PAIRS),
            chamber_opposite: mirror(ECOHAB_CHAMBER_PAIRS),
        }
    }

    /// Antenna at the other end of the pipe `antenna` belongs to.
    pub fn pipe_opposite(&self, antenna: AntennaId) -> Option<AntennaId> {
        self.pipe_opposite.get(&antenna).copied()
    }

    /// Other entrance of the chamber `antenna` belongs to.
    pub fn chamber_opposite(&self, antenna: AntennaId) -> Option<AntennaId> {
        self.chamber_opposite.get(&antenna).copied()
    }

    /// Whether `antenna` is wired into this apparatus.
    pub fn contains(&self, antenna: AntennaId) -> bool {
        self.pipe_opposite.contains_key(&antenna)
    }

    /// All antennas in ascending order.
    pub fn antennas(&self) -> impl Iterator<Item = AntennaId> + '_ {
        self.pipe_opposite.keys().copied()
    }

    /// True when `a` and `b` are the two entrances of one chamber, i.e. the
    /// step `a -> b` crossed a chamber rather than a pipe.
    pub fn is_chamber_pair(&self, a: AntennaId, b: AntennaId) -> bool {
        self.chamber_opposite(a) == Some(b)
    }

    /// True when `a` and `b` are the two ends of one pipe.
    pub fn is_pipe_pair(&self, a: AntennaId, b: AntennaId) -> bool {
        self.pipe_opposite(a) == Some(b)
    }

    /// Every pipe traversal, both ways, ordered by source antenna.
    pub fn pipe_directions(&self) -> Vec<DirectionKey> {
        self.pipe_opposite
            .iter()
            .map(|(&from, &to)| DirectionKey::new(from, to))
            .collect()
    }

    /// Fail on the first antenna not wired into this topology.
    pub fn validate_antennas(&self, antennas: &[AntennaId]) -> Result<()> {
        match antennas.iter().find(|a| !self.contains(**a)) {
            Some(&antenna) => Err(EngineError::UnknownAntenna { antenna }),
            None => Ok(()),
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::ecohab()
    }
}

fn mirror(pairs: &[(AntennaId, AntennaId)]) -> BTreeMap<AntennaId, AntennaId> {
    pairs
        .iter()
        .flat_map(|&(a, b)| [(a, b), (b, a)])
        .collect()
}

fn involution(
    kind: &str,
    pairs: &[(AntennaId, AntennaId)],
) -> Result<BTreeMap<AntennaId, AntennaId>> {
    let mut map = BTreeMap::new();
    for &(a, b) in pairs {
        if a == b {
            return Err(EngineError::InvalidTopology(format!(
                "{kind} antenna {a} is paired with itself"
            )));
        }
        for antenna in [a, b] {
            if map.contains_key(&antenna) {
                return Err(EngineError::InvalidTopology(format!(
                    "{kind} antenna {antenna} appears in more than one pair"
                )));
            }
        }
        map.insert(a, b);
        map.insert(b, a);
    }
    Ok(map)
}
