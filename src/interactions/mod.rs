//! Pairwise interaction detectors.
//!
//! - Following: one subject trailing another through the same traversal
//! - Dominance: one subject turned back in a pipe by another blocking it
//! - Matrices of both over every ordered pair of subjects

mod dominance;
mod following;
mod matrix;

pub use dominance::{dominance_count, push_out_events, DominanceEvent};
pub use following::{
    following_events, following_pair, following_single_direction, FollowingEvent,
    FollowingSummary,
};
pub use matrix::{dominance_matrix, following_matrices, for_each_following_pair, FollowingMatrices};
