//! Statistical machinery for the chance-level baseline.
//!
//! - Random interval re-placement with bounded restarts
//! - Null distributions of following, one seeded generator per iteration
//! - Mean/median summaries of those distributions

mod bootstrap;
mod null_model;
mod quantile;

pub use bootstrap::{counter_rng_seed, resample_intervals, Placement};
pub use null_model::{
    check_capacity, expected_matrices, null_distribution, pair_values, resample_subject,
    NullModelInput,
};
pub use quantile::{compute_quantile, mean, median, Baseline};
