//! Report types.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::statistics::Baseline;
use crate::types::{DirectionKey, Phase};

/// Subject-by-subject matrix with row and column labels.
///
/// For following, rows are leaders and columns followers; for dominance, rows
/// are the dominant subjects and columns the displaced ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMatrix {
    /// Row/column labels.
    pub subjects: Vec<String>,
    /// Values, `subjects.len()` square.
    pub values: DMatrix<f64>,
}

impl PairMatrix {
    /// Label a square matrix.
    pub fn new(subjects: Vec<String>, values: DMatrix<f64>) -> Self {
        debug_assert_eq!(values.nrows(), subjects.len());
        debug_assert_eq!(values.ncols(), subjects.len());
        Self { subjects, values }
    }

    fn index(&self, subject: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s == subject)
    }

    /// Value for `(row, col)` by subject name.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.values[(self.index(row)?, self.index(col)?)])
    }

    /// Element-wise `self - other`.
    pub fn minus(&self, other: &PairMatrix) -> PairMatrix {
        PairMatrix::new(self.subjects.clone(), &self.values - &other.values)
    }

    /// Sum of each row, in subject order.
    pub fn row_sums(&self) -> Vec<f64> {
        self.values.column_sum().iter().copied().collect()
    }

    /// Sum of each column, in subject order.
    pub fn column_sums(&self) -> Vec<f64> {
        self.values.row_sum().iter().copied().collect()
    }

    /// Sum of every entry.
    pub fn total(&self) -> f64 {
        self.values.sum()
    }
}

/// Per-subject totals for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    /// Subject identifier.
    pub subject: String,
    /// Traversals over the analyzed direction keys.
    pub activity: usize,
    /// Episodes in which the subject led.
    pub leading: f64,
    /// Episodes in which the subject followed.
    pub following: f64,
    /// Leading episodes above the baseline.
    pub leading_excess: f64,
    /// Following episodes above the baseline.
    pub following_excess: f64,
    /// `leading / activity` (0 without activity).
    pub leading_per_activity: f64,
    /// `following / activity` (0 without activity).
    pub following_per_activity: f64,
    /// `leading_excess / activity` (0 without activity).
    pub leading_excess_per_activity: f64,
    /// `following_excess / activity` (0 without activity).
    pub following_excess_per_activity: f64,
}

/// Observed following episode spans for one ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSpans {
    /// Subject that went first.
    pub leader: String,
    /// Subject that trailed.
    pub follower: String,
    /// Episode lengths in seconds.
    pub spans: Vec<f64>,
}

/// Raw null distribution for one ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDistribution {
    /// Subject that went first.
    pub leader: String,
    /// Subject that trailed.
    pub follower: String,
    /// Following count of each resample.
    pub counts: Vec<f64>,
    /// Shared-time fraction of each resample.
    pub time_together: Vec<f64>,
}

/// Settings a phase was analyzed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Resamples drawn.
    pub resamples: usize,
    /// Base seed of the phase's resampling generators.
    pub seed: u64,
    /// Statistic used for the expected values.
    pub baseline: Baseline,
    /// Direction keys matched and resampled.
    pub directions: Vec<DirectionKey>,
    /// Wall-clock time of the analysis.
    pub runtime_secs: f64,
}

/// Everything computed for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Window analyzed.
    pub phase: Phase,
    /// Observed following counts, `[leader, follower]`.
    pub following: PairMatrix,
    /// Expected following counts under the null model.
    pub following_expected: PairMatrix,
    /// `following - following_expected`.
    pub following_excess: PairMatrix,
    /// Observed shared pipe time as a fraction of the phase.
    pub time_together: PairMatrix,
    /// Expected shared time under the null model.
    pub time_together_expected: PairMatrix,
    /// `time_together - time_together_expected`.
    pub time_together_excess: PairMatrix,
    /// Push-out counts, `[dominant, displaced]`.
    pub dominance: PairMatrix,
    /// Per-subject totals.
    pub subjects: Vec<SubjectSummary>,
    /// Observed episode spans per ordered pair with at least one episode.
    pub spans: Vec<PairSpans>,
    /// Raw null distributions, when requested.
    pub distributions: Option<Vec<PairDistribution>>,
    /// Run settings.
    pub metadata: Metadata,
}

/// Reports for a sequence of phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Subjects analyzed, in matrix order.
    pub subjects: Vec<String>,
    /// One report per phase, in input order.
    pub phases: Vec<PhaseReport>,
    /// Episode spans per ordered pair, pooled over all phases.
    pub spans: Vec<PairSpans>,
}

impl ExperimentReport {
    /// Report for the phase named `name`.
    pub fn phase(&self, name: &str) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase.name == name)
    }
}
