//! Main `InteractionEngine` entry point and builder.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::interactions::{
    dominance_count, dominance_matrix, following_pair, for_each_following_pair, FollowingMatrices,
    FollowingSummary,
};
use crate::intervals::{MotionIntervals, StateSequence};
use crate::result::{
    ExperimentReport, Metadata, PairDistribution, PairMatrix, PairSpans, PhaseReport,
    SubjectSummary,
};
use crate::statistics::{
    counter_rng_seed, expected_matrices, null_distribution, pair_values, resample_intervals,
    Baseline, NullModelInput, Placement,
};
use crate::stream::{AntennaStream, ReadingSource};
use crate::topology::Topology;
use crate::types::{DirectionKey, Phase};

/// Main entry point for interaction analysis.
///
/// Use the builder pattern to configure the run, then hand it a
/// [`ReadingSource`] together with the subjects and phases to analyze.
///
/// # Example
///
/// ```ignore
/// use cohort_dynamics::{InteractionEngine, Phase, ReadingLog};
///
/// let log = ReadingLog::from_readings(readings)?;
/// let night = Phase::new("dark 1", 43_200.0, 86_400.0)?;
///
/// let report = InteractionEngine::new()
///     .resamples(500)
///     .seed(42)
///     .analyze_phase(&log, &["mouse_1", "mouse_2"], &night)?;
/// ```
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    config: Config,
    topology: Topology,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionEngine {
    /// Create with default configuration on the Eco-HAB topology.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            topology: Topology::ecohab(),
        }
    }

    /// Create with a small resample count for exploration and tests.
    ///
    /// Settings:
    /// - 100 resamples (vs 1,000 default)
    pub fn quick() -> Self {
        Self::new().resamples(100)
    }

    /// Create with a large resample count for final figures.
    ///
    /// Settings:
    /// - 5,000 resamples (vs 1,000 default)
    pub fn thorough() -> Self {
        Self::new().resamples(5_000)
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use a different antenna layout.
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Apply `COHORT_*` environment overrides, see [`Config::from_env`].
    pub fn from_env(mut self) -> Result<Self> {
        self.config = self.config.from_env()?;
        Ok(self)
    }

    /// Set the number of bootstrap resamples per phase.
    pub fn resamples(mut self, n: usize) -> Self {
        self.config.resamples = n;
        self
    }

    /// Set the base seed for resampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the statistic the null distribution is collapsed with.
    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.config.baseline = baseline;
        self
    }

    /// Set the restart bound of each interval placement.
    pub fn max_restarts(mut self, n: usize) -> Self {
        self.config.max_restarts = n;
        self
    }

    /// Keep the raw null distributions in phase reports.
    pub fn keep_distributions(mut self, keep: bool) -> Self {
        self.config.keep_distributions = keep;
        self
    }

    /// Restrict following and resampling to the given directions.
    pub fn directions(mut self, keys: Vec<DirectionKey>) -> Self {
        self.config.directions = Some(keys);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the antenna layout.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Direction keys used by [`analyze_phase`](Self::analyze_phase).
    pub fn direction_keys(&self) -> Vec<DirectionKey> {
        self.config
            .directions
            .clone()
            .unwrap_or_else(|| self.topology.pipe_directions())
    }

    /// Motion intervals of one subject inside `phase`, grouped by direction.
    pub fn motion_intervals<S: ReadingSource + ?Sized>(
        &self,
        source: &S,
        subject: &str,
        phase: &Phase,
    ) -> Result<MotionIntervals> {
        check_phase(phase)?;
        let stream = self.load(source, subject, phase)?;
        Ok(MotionIntervals::from_states(&StateSequence::from_stream(&stream)))
    }

    /// Following of `follower` behind `leader` inside `phase` over `keys`.
    pub fn following<S: ReadingSource + ?Sized>(
        &self,
        source: &S,
        leader: &str,
        follower: &str,
        phase: &Phase,
        keys: &[DirectionKey],
    ) -> Result<FollowingSummary> {
        self.check_keys(keys)?;
        let leader = self.motion_intervals(source, leader, phase)?;
        let follower = self.motion_intervals(source, follower, phase)?;
        Ok(following_pair(&leader, &follower, keys))
    }

    /// Number of times `dominant` pushed `displaced` out of a pipe in `phase`.
    pub fn dominance<S: ReadingSource + ?Sized>(
        &self,
        source: &S,
        dominant: &str,
        displaced: &str,
        phase: &Phase,
    ) -> Result<usize> {
        check_phase(phase)?;
        let a = self.load(source, dominant, phase)?;
        let b = self.load(source, displaced, phase)?;
        if dominant == displaced {
            return Ok(0);
        }
        Ok(dominance_count(&self.topology, &a, &b))
    }

    /// Randomly re-place one subject's `key` intervals inside `phase`.
    ///
    /// Positions are relative to the phase start. `seed` overrides the
    /// configured seed for this call.
    pub fn resample<S: ReadingSource + ?Sized>(
        &self,
        source: &S,
        subject: &str,
        key: DirectionKey,
        phase: &Phase,
        seed: Option<u64>,
    ) -> Result<Placement> {
        self.check_keys(&[key])?;
        let observed = self.motion_intervals(source, subject, phase)?;
        let durations = observed.get(&key).map(|d| d.durations()).unwrap_or_default();
        let seed = seed.unwrap_or_else(|| self.resolve_seed());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        resample_intervals(&durations, phase.duration(), self.config.max_restarts, &mut rng).map_err(
            |err| EngineError::Resampling {
                subject: subject.to_string(),
                direction: key,
                source: Box::new(err),
            },
        )
    }

    /// Observed, expected and excess interaction matrices for one phase.
    pub fn analyze_phase<S, N>(&self, source: &S, subjects: &[N], phase: &Phase) -> Result<PhaseReport>
    where
        S: ReadingSource + ?Sized,
        N: AsRef<str>,
    {
        let subjects = subject_names(subjects)?;
        self.config.validate()?;
        let seed = self.resolve_seed();
        self.run_phase(source, &subjects, phase, seed)
    }

    /// Analyze every phase in order and pool the following spans.
    ///
    /// Phase `k` resamples with `counter_rng_seed(seed, k)`.
    pub fn analyze<S, N>(&self, source: &S, subjects: &[N], phases: &[Phase]) -> Result<ExperimentReport>
    where
        S: ReadingSource + ?Sized,
        N: AsRef<str>,
    {
        let subjects = subject_names(subjects)?;
        self.config.validate()?;
        let seed = self.resolve_seed();

        let mut reports = Vec::with_capacity(phases.len());
        let mut pooled: BTreeMap<(usize, usize), Vec<f64>> = BTreeMap::new();
        for (k, phase) in phases.iter().enumerate() {
            let report = self.run_phase(source, &subjects, phase, counter_rng_seed(seed, k as u64))?;
            for pair in &report.spans {
                let i = index_of(&subjects, &pair.leader);
                let j = index_of(&subjects, &pair.follower);
                pooled.entry((i, j)).or_default().extend_from_slice(&pair.spans);
            }
            reports.push(report);
        }

        let spans = pooled
            .into_iter()
            .map(|((i, j), spans)| PairSpans {
                leader: subjects[i].clone(),
                follower: subjects[j].clone(),
                spans,
            })
            .collect();

        Ok(ExperimentReport {
            subjects,
            phases: reports,
            spans,
        })
    }

    fn run_phase<S: ReadingSource + ?Sized>(
        &self,
        source: &S,
        subjects: &[String],
        phase: &Phase,
        seed: u64,
    ) -> Result<PhaseReport> {
        let start_time = Instant::now();
        check_phase(phase)?;
        let keys = self.direction_keys();
        self.check_keys(&keys)?;

        let n = subjects.len();
        let duration = phase.duration();
        log::info!(
            "analyzing phase {} ({:.0}s, {} subjects, {} resamples)",
            phase.name,
            duration,
            n,
            self.config.resamples
        );

        let streams = subjects
            .iter()
            .map(|s| self.load(source, s, phase))
            .collect::<Result<Vec<AntennaStream>>>()?;
        let intervals: Vec<MotionIntervals> = streams
            .iter()
            .map(|s| MotionIntervals::from_states(&StateSequence::from_stream(s)))
            .collect();

        for (name, stream) in subjects.iter().zip(&streams) {
            if stream.is_empty() {
                log::warn!("{name}: no readings in phase {}", phase.name);
            }
        }
        let moving = intervals.iter().filter(|m| m.count(&keys) > 0).count();
        if moving < 2 {
            log::warn!(
                "phase {}: only {moving} subject(s) traversed a pipe, following is zero",
                phase.name
            );
        }

        // Observed
        let mut observed = FollowingMatrices::zeros(n);
        let mut spans = Vec::new();
        for_each_following_pair(&intervals, &keys, |i, j, summary| {
            observed.counts[(i, j)] = summary.count as f64;
            observed.time_together[(i, j)] = summary.total_time / duration;
            if !summary.spans.is_empty() {
                spans.push(PairSpans {
                    leader: subjects[i].clone(),
                    follower: subjects[j].clone(),
                    spans: summary.spans.clone(),
                });
            }
        });
        let dominance = dominance_matrix(&self.topology, &streams);

        // Null model
        let input = NullModelInput {
            subjects,
            intervals: &intervals,
            keys: &keys,
            duration,
            max_restarts: self.config.max_restarts,
        };
        let samples = null_distribution(&input, self.config.resamples, seed)?;
        let expected = expected_matrices(&samples, n, self.config.baseline);

        let distributions = self.config.keep_distributions.then(|| {
            let mut out = Vec::with_capacity(n * n.saturating_sub(1));
            for i in 0..n {
                for j in 0..n {
                    if i != j {
                        out.push(PairDistribution {
                            leader: subjects[i].clone(),
                            follower: subjects[j].clone(),
                            counts: pair_values(&samples, i, j, |s| &s.counts),
                            time_together: pair_values(&samples, i, j, |s| &s.time_together),
                        });
                    }
                }
            }
            out
        });

        let label = |values| PairMatrix::new(subjects.to_vec(), values);
        let following = label(observed.counts);
        let following_expected = label(expected.counts);
        let following_excess = following.minus(&following_expected);
        let time_together = label(observed.time_together);
        let time_together_expected = label(expected.time_together);
        let time_together_excess = time_together.minus(&time_together_expected);

        let summaries = subject_summaries(subjects, &intervals, &keys, &following, &following_excess);

        let runtime_secs = start_time.elapsed().as_secs_f64();
        log::debug!("phase {} done in {runtime_secs:.2}s", phase.name);

        Ok(PhaseReport {
            phase: phase.clone(),
            following,
            following_expected,
            following_excess,
            time_together,
            time_together_expected,
            time_together_excess,
            dominance: label(dominance),
            subjects: summaries,
            spans,
            distributions,
            metadata: Metadata {
                resamples: self.config.resamples,
                seed,
                baseline: self.config.baseline,
                directions: keys,
                runtime_secs,
            },
        })
    }

    fn load<S: ReadingSource + ?Sized>(
        &self,
        source: &S,
        subject: &str,
        phase: &Phase,
    ) -> Result<AntennaStream> {
        let stream = source.stream(subject, phase)?;
        self.topology.validate_antennas(stream.antennas())?;
        Ok(stream)
    }

    fn check_keys(&self, keys: &[DirectionKey]) -> Result<()> {
        for key in keys {
            self.topology.validate_antennas(&[key.from, key.to])?;
        }
        Ok(())
    }

    fn resolve_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| {
            let seed = rand::random::<u64>();
            log::debug!("no seed configured, resampling with seed {seed}");
            seed
        })
    }
}

fn check_phase(phase: &Phase) -> Result<()> {
    if phase.end > phase.start {
        Ok(())
    } else {
        Err(EngineError::InvalidWindow {
            start: phase.start,
            end: phase.end,
        })
    }
}

fn subject_names<N: AsRef<str>>(subjects: &[N]) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    subjects
        .iter()
        .map(|s| {
            let name = s.as_ref();
            if seen.insert(name) {
                Ok(name.to_string())
            } else {
                Err(EngineError::InvalidConfig(format!("subject {name:?} listed twice")))
            }
        })
        .collect()
}

fn index_of(subjects: &[String], name: &str) -> usize {
    subjects.iter().position(|s| s == name).unwrap_or_default()
}

fn per_activity(value: f64, activity: usize) -> f64 {
    if activity == 0 {
        0.0
    } else {
        value / activity as f64
    }
}

fn subject_summaries(
    subjects: &[String],
    intervals: &[MotionIntervals],
    keys: &[DirectionKey],
    following: &PairMatrix,
    excess: &PairMatrix,
) -> Vec<SubjectSummary> {
    let leading = following.row_sums();
    let followed = following.column_sums();
    let leading_excess = excess.row_sums();
    let following_excess = excess.column_sums();

    subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            let activity = intervals[i].count(keys);
            SubjectSummary {
                subject: subject.clone(),
                activity,
                leading: leading[i],
                following: followed[i],
                leading_excess: leading_excess[i],
                following_excess: following_excess[i],
                leading_per_activity: per_activity(leading[i], activity),
                following_per_activity: per_activity(followed[i], activity),
                leading_excess_per_activity: per_activity(leading_excess[i], activity),
                following_excess_per_activity: per_activity(following_excess[i], activity),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::ReadingLog;
    use crate::types::Reading;

    fn readings() -> ReadingLog {
        let readings = [
            ("a", 1, 10.0),
            ("a", 2, 15.0),
            ("a", 2, 40.0),
            ("a", 1, 45.0),
            ("b", 1, 12.0),
            ("b", 2, 18.0),
            ("c", 5, 100.0),
        ];
        ReadingLog::from_readings(
            readings
                .iter()
                .map(|&(s, antenna, t)| Reading::new(s, antenna, t)),
        )
        .unwrap()
    }

    fn phase() -> Phase {
        Phase::new("test", 0.0, 600.0).unwrap()
    }

    #[test]
    fn test_presets() {
        assert_eq!(InteractionEngine::new().config().resamples, 1_000);
        assert_eq!(InteractionEngine::quick().config().resamples, 100);
        assert_eq!(InteractionEngine::thorough().config().resamples, 5_000);
    }

    #[test]
    fn test_builder_setters() {
        let engine = InteractionEngine::new()
            .resamples(7)
            .seed(3)
            .baseline(Baseline::Median)
            .max_restarts(5)
            .keep_distributions(true)
            .directions(vec![DirectionKey::new(1, 2)]);
        let config = engine.config();
        assert_eq!(config.resamples, 7);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.baseline, Baseline::Median);
        assert_eq!(config.max_restarts, 5);
        assert!(config.keep_distributions);
        assert_eq!(engine.direction_keys(), vec![DirectionKey::new(1, 2)]);
    }

    #[test]
    fn test_default_keys_are_pipe_traversals() {
        let keys = InteractionEngine::new().direction_keys();
        assert_eq!(keys.len(), 8);
        assert!(keys.contains(&DirectionKey::new(2, 1)));
        assert!(!keys.contains(&DirectionKey::new(2, 3)));
    }

    #[test]
    fn test_following_operation() {
        let summary = InteractionEngine::new()
            .following(&readings(), "a", "b", &phase(), &[DirectionKey::new(1, 2)])
            .unwrap();
        assert_eq!(summary.count, 1);
        assert!((summary.total_time - 3.0).abs() < 1e-12);
        assert_eq!(summary.spans, vec![8.0]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = InteractionEngine::new()
            .following(&readings(), "a", "b", &phase(), &[DirectionKey::new(1, 9)])
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownAntenna { antenna: 9 });
    }

    #[test]
    fn test_dominance_self_is_zero() {
        let engine = InteractionEngine::new();
        assert_eq!(engine.dominance(&readings(), "a", "a", &phase()).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_subjects_rejected() {
        let err = InteractionEngine::quick()
            .seed(1)
            .analyze_phase(&readings(), &["a", "a"], &phase())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_inverted_phase_rejected() {
        let bad = Phase {
            name: "bad".into(),
            start: 10.0,
            end: 10.0,
        };
        let err = InteractionEngine::new()
            .motion_intervals(&readings(), "a", &bad)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }

    #[test]
    fn test_subject_summary_normalization() {
        let report = InteractionEngine::quick()
            .seed(11)
            .analyze_phase(&readings(), &["a", "b", "c"], &phase())
            .unwrap();
        let a = &report.subjects[0];
        assert_eq!(a.activity, 2);
        assert_eq!(a.leading, 1.0);
        assert_eq!(a.leading_per_activity, 0.5);
        let c = &report.subjects[2];
        assert_eq!(c.activity, 0);
        assert_eq!(c.leading_per_activity, 0.0);
        assert_eq!(report.metadata.seed, 11);
    }
}
