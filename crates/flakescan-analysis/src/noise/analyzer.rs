//! Noise scoring over recorded parameter observations.
//!
//! A parameter is noisy when its recorded value varies across repeated runs
//! of the same test without being an intentional test variable. The score is
//! the fraction of pairwise run comparisons where the value differs, under
//! structural equality with numeric epsilon tolerance.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::trace;

use flakescan_core::errors::AnalysisError;
use flakescan_core::model::{NoiseClass, NoiseReport, TestRun, Value};

/// Pure scorer over one test case's run sequence. No side effects.
#[derive(Debug, Clone)]
pub struct NoiseAnalyzer {
    epsilon: f64,
}

impl NoiseAnalyzer {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Score every parameter observed in `runs` against `threshold`.
    ///
    /// All runs must belong to one test case. Each parameter is scored over
    /// one slot per run; a run where the parameter was not observed
    /// contributes a distinct "absent" slot, so partially recorded parameters
    /// register as noise. Reports come back sorted by parameter name.
    pub fn analyze(
        &self,
        runs: &[TestRun],
        threshold: f64,
    ) -> Result<Vec<NoiseReport>, AnalysisError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AnalysisError::InvalidThreshold(threshold));
        }
        if runs.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let mut names: BTreeSet<&str> = BTreeSet::new();
        for run in runs {
            for obs in &run.parameters {
                names.insert(&obs.parameter);
            }
        }

        let reports = names
            .into_iter()
            .map(|name| self.score_parameter(name, runs, threshold))
            .collect();
        Ok(reports)
    }

    fn score_parameter(&self, name: &str, runs: &[TestRun], threshold: f64) -> NoiseReport {
        let slots: Vec<Option<&Value>> = runs.iter().map(|r| r.parameter(name)).collect();
        let samples = slots.len();

        let mut differing = 0usize;
        let mut total = 0usize;
        for i in 0..samples {
            for j in (i + 1)..samples {
                total += 1;
                if !self.slot_eq(slots[i], slots[j]) {
                    differing += 1;
                }
            }
        }

        let score = if total == 0 {
            0.0
        } else {
            differing as f64 / total as f64
        };

        let insufficient_data = samples < 2;
        let classification = if !insufficient_data && score > threshold {
            NoiseClass::Noisy
        } else {
            // Fewer than two samples cannot reveal noise: STABLE by
            // convention, flagged via insufficient_data.
            NoiseClass::Stable
        };

        trace!(parameter = name, score, samples, "scored parameter");

        NoiseReport {
            parameter: name.to_string(),
            score,
            classification,
            samples,
            distinct_values: self.count_distinct(&slots),
            insufficient_data,
        }
    }

    /// Distinct slot values under structural equality; absence counts once.
    fn count_distinct(&self, slots: &[Option<&Value>]) -> usize {
        let mut distinct: Vec<Option<&Value>> = Vec::new();
        for slot in slots {
            if !distinct.iter().any(|seen| self.slot_eq(*seen, *slot)) {
                distinct.push(*slot);
            }
        }
        distinct.len()
    }

    fn slot_eq(&self, a: Option<&Value>, b: Option<&Value>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => x.structural_eq(y, self.epsilon),
            _ => false,
        }
    }
}

/// The STABLE parameter set from a noise report list.
///
/// Feeds the idempotency validator's input signature: noisy parameters must
/// be excluded from the equality key so they cannot manufacture spurious
/// violations. Passed explicitly, never via shared state.
pub fn stable_parameters(reports: &[NoiseReport]) -> FxHashSet<String> {
    reports
        .iter()
        .filter(|r| r.classification == NoiseClass::Stable)
        .map(|r| r.parameter.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flakescan_core::model::{OperationKind, ParameterObservation};

    fn run_with_params(test_case: &str, run_index: u32, params: &[(&str, Value)]) -> TestRun {
        TestRun {
            test_case: test_case.to_string(),
            run_index,
            parameters: params
                .iter()
                .map(|(name, value)| ParameterObservation {
                    parameter: name.to_string(),
                    value: value.clone(),
                    run_index,
                    test_case: test_case.to_string(),
                })
                .collect(),
            operation: OperationKind::Read,
            outcome: Value::Null,
            post_state: None,
            success: true,
            error: None,
            recorded_at_ms: None,
        }
    }

    #[test]
    fn identical_values_score_zero() {
        let runs = vec![
            run_with_params("T1", 0, &[("host", Value::Str("api".into()))]),
            run_with_params("T1", 1, &[("host", Value::Str("api".into()))]),
            run_with_params("T1", 2, &[("host", Value::Str("api".into()))]),
        ];
        let reports = NoiseAnalyzer::new(1e-9).analyze(&runs, 0.0).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].score, 0.0);
        assert_eq!(reports[0].classification, NoiseClass::Stable);
        assert_eq!(reports[0].distinct_values, 1);
    }

    #[test]
    fn all_distinct_values_score_one() {
        // Scenario: "seed" observed as 42, 17, 93 — zero of three pairwise
        // comparisons equal.
        let runs = vec![
            run_with_params("T1", 0, &[("seed", Value::Int(42))]),
            run_with_params("T1", 1, &[("seed", Value::Int(17))]),
            run_with_params("T1", 2, &[("seed", Value::Int(93))]),
        ];
        let reports = NoiseAnalyzer::new(1e-9).analyze(&runs, 0.1).unwrap();
        assert_eq!(reports[0].score, 1.0);
        assert_eq!(reports[0].classification, NoiseClass::Noisy);
        assert_eq!(reports[0].distinct_values, 3);
        assert_eq!(reports[0].samples, 3);
    }

    #[test]
    fn absence_in_some_runs_contributes_noise() {
        let runs = vec![
            run_with_params("T1", 0, &[("token", Value::Str("abc".into()))]),
            run_with_params("T1", 1, &[]),
        ];
        let reports = NoiseAnalyzer::new(1e-9).analyze(&runs, 0.5).unwrap();
        assert_eq!(reports[0].score, 1.0);
        assert_eq!(reports[0].classification, NoiseClass::Noisy);
        // present value + absent
        assert_eq!(reports[0].distinct_values, 2);
    }

    #[test]
    fn single_sample_is_stable_with_flag() {
        let runs = vec![run_with_params("T1", 0, &[("seed", Value::Int(1))])];
        let reports = NoiseAnalyzer::new(1e-9).analyze(&runs, 0.1).unwrap();
        assert_eq!(reports[0].classification, NoiseClass::Stable);
        assert!(reports[0].insufficient_data);
        assert_eq!(reports[0].score, 0.0);
    }

    #[test]
    fn floats_within_epsilon_are_not_noise() {
        let runs = vec![
            run_with_params("T1", 0, &[("latency", Value::Float(0.30000001))]),
            run_with_params("T1", 1, &[("latency", Value::Float(0.30000002))]),
        ];
        let reports = NoiseAnalyzer::new(1e-6).analyze(&runs, 0.0).unwrap();
        assert_eq!(reports[0].score, 0.0);
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let runs = vec![run_with_params("T1", 0, &[])];
        let analyzer = NoiseAnalyzer::new(1e-9);
        assert!(matches!(
            analyzer.analyze(&runs, -0.1),
            Err(AnalysisError::InvalidThreshold(_))
        ));
        assert!(matches!(
            analyzer.analyze(&runs, 1.1),
            Err(AnalysisError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn empty_run_sequence_is_rejected() {
        assert!(matches!(
            NoiseAnalyzer::new(1e-9).analyze(&[], 0.1),
            Err(AnalysisError::EmptyInput)
        ));
    }

    #[test]
    fn score_on_boundary_is_stable() {
        // Exactly at the threshold is not strictly greater: STABLE.
        let runs = vec![
            run_with_params("T1", 0, &[("flag", Value::Bool(true))]),
            run_with_params("T1", 1, &[("flag", Value::Bool(false))]),
        ];
        let reports = NoiseAnalyzer::new(1e-9).analyze(&runs, 1.0).unwrap();
        assert_eq!(reports[0].score, 1.0);
        assert_eq!(reports[0].classification, NoiseClass::Stable);
    }

    #[test]
    fn stable_parameters_excludes_noisy() {
        let runs = vec![
            run_with_params(
                "T1",
                0,
                &[("seed", Value::Int(1)), ("host", Value::Str("api".into()))],
            ),
            run_with_params(
                "T1",
                1,
                &[("seed", Value::Int(2)), ("host", Value::Str("api".into()))],
            ),
        ];
        let reports = NoiseAnalyzer::new(1e-9).analyze(&runs, 0.1).unwrap();
        let stable = stable_parameters(&reports);
        assert!(stable.contains("host"));
        assert!(!stable.contains("seed"));
    }
}
