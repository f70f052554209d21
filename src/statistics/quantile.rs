//! Summary statistics over bootstrap distributions.
//!
//! Quantiles use `slice.select_nth_unstable_by()` (introselect, O(n) average)
//! and the R-7 definition with linear interpolation.

use serde::{Deserialize, Serialize};

/// Compute a single quantile from a mutable slice.
///
/// The slice is partially reordered as a side effect.
///
/// # Panics
///
/// Panics if `data` is empty or if `p` is outside [0, 1].
pub fn compute_quantile(data: &mut [f64], p: f64) -> f64 {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = data.len();
    if n == 1 {
        return data[0];
    }

    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        let (_, &mut max, _) = data.select_nth_unstable_by(n - 1, |a, b| a.total_cmp(b));
        return max;
    }

    let (_, &mut lower, upper) = data.select_nth_unstable_by(h_floor, |a, b| a.total_cmp(b));
    if h_frac == 0.0 {
        return lower;
    }

    // The next order statistic is the minimum of the upper partition.
    let upper_min = upper
        .iter()
        .copied()
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(lower);

    lower + h_frac * (upper_min - lower)
}

/// Median of `data` (0.0 for an empty slice).
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut scratch = data.to_vec();
    compute_quantile(&mut scratch, 0.5)
}

/// Arithmetic mean of `data` (0.0 for an empty slice).
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Statistic used to collapse a null distribution into an expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Baseline {
    /// Mean over resamples.
    #[default]
    Mean,
    /// Median over resamples.
    Median,
}

impl Baseline {
    /// Collapse `data` with this statistic.
    pub fn summarize(self, data: &[f64]) -> f64 {
        match self {
            Baseline::Mean => mean(data),
            Baseline::Median => median(data),
        }
    }

    /// Short label, e.g. for file or column names downstream.
    pub fn label(self) -> &'static str {
        match self {
            Baseline::Mean => "mean",
            Baseline::Median => "median",
        }
    }
}

impl std::str::FromStr for Baseline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Baseline::Mean),
            "median" => Ok(Baseline::Median),
            other => Err(format!("unknown baseline {other:?} (expected mean or median)")),
        }
    }
}
