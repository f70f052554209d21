//! # cohort-dynamics
//!
//! Social interaction statistics from RFID antenna readings in multi-chamber
//! habitats (Eco-HAB style: four chambers in a ring, joined by pipes with an
//! antenna at each end).
//!
//! From each animal's time-ordered antenna readings this crate computes:
//! - Pipe traversals (motion intervals) grouped by direction
//! - Following: how often one animal enters a pipe right behind another and
//!   leaves it after the first one did
//! - Tube dominance: how often one animal pushes another back out of a pipe
//! - A chance-level baseline for following, obtained by randomly re-placing
//!   every traversal inside the phase while keeping its duration
//!
//! ## Quick Start
//!
//! ```ignore
//! use cohort_dynamics::{InteractionEngine, Phase, Reading, ReadingLog};
//!
//! let log = ReadingLog::from_readings(readings)?;
//! let phases = Phase::new("dark 1", 0.0, 43_200.0)?.bins(3_600.0)?;
//!
//! let report = InteractionEngine::new()
//!     .seed(7)
//!     .analyze(&log, &["m1", "m2", "m3"], &phases)?;
//!
//! for phase in &report.phases {
//!     println!("{}", cohort_dynamics::output::terminal::format_phase(phase));
//! }
//! ```
//!
//! Progress and degenerate inputs are reported through the `log` facade; no
//! logger is installed by the library.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod engine;
mod error;
mod result;
mod thread_pool;
mod topology;
mod types;

// Functional modules
pub mod interactions;
pub mod intervals;
pub mod output;
pub mod statistics;
pub mod stream;

// Re-exports for public API
pub use config::Config;
pub use constants::{
    ATTEMPTS_PER_INTERVAL, DEFAULT_MAX_RESTARTS, DEFAULT_RESAMPLES, ECOHAB_CHAMBER_PAIRS,
    ECOHAB_PIPE_PAIRS,
};
pub use engine::InteractionEngine;
pub use error::{EngineError, Result};
pub use interactions::{DominanceEvent, FollowingEvent, FollowingSummary};
pub use intervals::{DirectionIntervals, MotionIntervals, StateSequence};
pub use result::{
    ExperimentReport, Metadata, PairDistribution, PairMatrix, PairSpans, PhaseReport,
    SubjectSummary,
};
pub use statistics::{Baseline, Placement};
pub use stream::{AntennaStream, ReadingLog, ReadingSource};
pub use topology::Topology;
pub use types::{AntennaId, DirectionKey, Phase, Reading, Timestamp};

/// Analyze one phase with the default configuration.
///
/// Shorthand for `InteractionEngine::new().analyze_phase(source, subjects, phase)`.
pub fn analyze_phase<S, N>(source: &S, subjects: &[N], phase: &Phase) -> Result<PhaseReport>
where
    S: ReadingSource + ?Sized,
    N: AsRef<str>,
{
    InteractionEngine::new().analyze_phase(source, subjects, phase)
}
