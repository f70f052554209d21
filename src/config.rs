//! Configuration for interaction analysis.

use std::env;

use crate::constants::{DEFAULT_MAX_RESTARTS, DEFAULT_RESAMPLES};
use crate::error::{EngineError, Result};
use crate::statistics::Baseline;
use crate::types::DirectionKey;

/// Configuration options for `InteractionEngine`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bootstrap resamples per phase (default: 1,000).
    pub resamples: usize,

    /// Optional base seed for the resampling generators.
    ///
    /// When unset, a seed is drawn once per run and logged at debug level so
    /// the run can be reproduced.
    pub seed: Option<u64>,

    /// Statistic collapsing the null distribution (default: mean).
    pub baseline: Baseline,

    /// Whole-placement restarts allowed before a resample fails (default: 10,000).
    pub max_restarts: usize,

    /// Keep every pair's raw null distribution in the report (default: false).
    pub keep_distributions: bool,

    /// Direction keys used for following and resampling.
    ///
    /// `None` (default) means every pipe traversal of the topology.
    pub directions: Option<Vec<DirectionKey>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            seed: None,
            baseline: Baseline::Mean,
            max_restarts: DEFAULT_MAX_RESTARTS,
            keep_distributions: false,
            directions: None,
        }
    }
}

impl Config {
    /// Merge overrides from environment variables.
    ///
    /// Recognized: `COHORT_RESAMPLES`, `COHORT_SEED`, `COHORT_BASELINE`
    /// (`mean`/`median`) and `COHORT_MAX_RESTARTS`. Unset variables leave the
    /// field untouched; unparsable ones are an error.
    pub fn from_env(mut self) -> Result<Self> {
        if let Some(n) = parse_env::<usize>("COHORT_RESAMPLES")? {
            self.resamples = n;
        }
        if let Some(seed) = parse_env::<u64>("COHORT_SEED")? {
            self.seed = Some(seed);
        }
        if let Some(baseline) = parse_env::<Baseline>("COHORT_BASELINE")? {
            self.baseline = baseline;
        }
        if let Some(n) = parse_env::<usize>("COHORT_MAX_RESTARTS")? {
            self.max_restarts = n;
        }
        Ok(self)
    }

    /// Reject configurations that cannot produce a baseline.
    pub fn validate(&self) -> Result<()> {
        if self.resamples == 0 {
            return Err(EngineError::InvalidConfig(
                "resamples must be at least 1".to_string(),
            ));
        }
        if matches!(&self.directions, Some(keys) if keys.is_empty()) {
            return Err(EngineError::InvalidConfig(
                "direction list is empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EngineError::InvalidConfig(format!("{name}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}
