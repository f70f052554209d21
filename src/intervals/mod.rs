//! From raw antenna streams to directed motion intervals.
//!
//! - Shared bracketing search over sorted timestamps
//! - State-change reduction (drop stationary repeats)
//! - Directed interval extraction, grouped by antenna pair

mod extract;
mod reduce;
pub mod search;

pub use extract::{motion_intervals, DirectionIntervals, MotionInterval, MotionIntervals};
pub use reduce::{change_indices, State, StateSequence};
pub use search::{bracket, Bracket};
