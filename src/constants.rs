//! Default constants.

use crate::types::AntennaId;

/// Pipe ends of the standard eight-antenna apparatus.
pub const ECOHAB_PIPE_PAIRS: &[(AntennaId, AntennaId)] = &[(1, 2), (3, 4), (5, 6), (7, 8)];

/// Chamber entrances of the standard eight-antenna apparatus.
pub const ECOHAB_CHAMBER_PAIRS: &[(AntennaId, AntennaId)] = &[(8, 1), (2, 3), (4, 5), (6, 7)];

/// Default number of bootstrap resamples per phase.
pub const DEFAULT_RESAMPLES: usize = 1_000;

/// Default bound on whole-placement restarts in the interval randomizer.
pub const DEFAULT_MAX_RESTARTS: usize = 10_000;

/// Attempts allowed per placement round, as a multiple of the interval count.
pub const ATTEMPTS_PER_INTERVAL: usize = 2;
