//! Idempotency validation over one test case's run sequence.
//!
//! Runs are grouped by the xxh3 signature of their STABLE parameter
//! sub-tuple (the noise analyzer's output feeds the key — noisy parameters
//! are excluded so they cannot manufacture spurious violations). Within each
//! group of at least two runs, every repeat is compared against the group
//! baseline under the operation kind's rule.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use flakescan_core::config::VolatilityConfig;
use flakescan_core::errors::ValidationError;
use flakescan_core::model::{signature_hash, IdempotencyClass, IdempotencyVerdict, TestRun};

use super::rules;

/// Pure validator over one test case's runs. No side effects.
#[derive(Debug, Clone)]
pub struct IdempotencyValidator {
    epsilon: f64,
    volatility: VolatilityConfig,
}

impl IdempotencyValidator {
    pub fn new(epsilon: f64, volatility: VolatilityConfig) -> Self {
        Self { epsilon, volatility }
    }

    /// Classify the test case as IDEMPOTENT, VIOLATION, or INDETERMINATE.
    ///
    /// `stable_params` is the STABLE set from the noise analyzer for this
    /// test case. All runs must share one test case id; the operation kind
    /// is taken from the first run and must be CRUD. A single run or no
    /// signature group of two is INDETERMINATE, not an error.
    pub fn validate(
        &self,
        runs: &[TestRun],
        stable_params: &FxHashSet<String>,
    ) -> Result<IdempotencyVerdict, ValidationError> {
        let first = runs.first().ok_or(ValidationError::EmptyInput)?;
        let test_case = first.test_case.clone();
        let kind = first.operation;

        for run in runs {
            if run.test_case != test_case {
                return Err(ValidationError::InconsistentTestCase {
                    expected: test_case,
                    found: run.test_case.clone(),
                });
            }
        }

        if !kind.is_crud() {
            return Err(ValidationError::UnknownOperationKind {
                test_case,
                kind: "NONE".to_string(),
            });
        }

        // Declared-input signature: STABLE parameters only, in sorted order
        // so the key is independent of observation order.
        let mut key_params: Vec<&str> = stable_params.iter().map(String::as_str).collect();
        key_params.sort_unstable();

        let mut groups: FxHashMap<u64, SmallVec<[usize; 4]>> = FxHashMap::default();
        for (i, run) in runs.iter().enumerate() {
            let slots: Vec<_> = key_params
                .iter()
                .map(|name| (*name, run.parameter(name)))
                .collect();
            groups.entry(signature_hash(&slots)).or_default().push(i);
        }

        // Deterministic group order: by smallest run index in the group.
        let mut ordered: Vec<SmallVec<[usize; 4]>> = groups.into_values().collect();
        for group in &mut ordered {
            group.sort_by_key(|&i| runs[i].run_index);
        }
        ordered.sort_by_key(|group| group.first().map(|&i| runs[i].run_index));

        let volatile: FxHashSet<String> = self
            .volatility
            .for_operation(kind)
            .iter()
            .cloned()
            .collect();

        let mut comparable = false;
        for group in &ordered {
            let Some((&baseline_idx, repeats)) = group.split_first() else {
                continue;
            };
            if repeats.is_empty() {
                continue;
            }
            comparable = true;
            let baseline = &runs[baseline_idx];
            for &repeat_idx in repeats {
                let repeat = &runs[repeat_idx];
                let diff = rules::compare(kind, baseline, repeat, self.epsilon, &volatile);
                if !diff.is_empty() {
                    trace!(
                        test_case = %test_case,
                        baseline = baseline.run_index,
                        repeat = repeat.run_index,
                        fields = diff.len(),
                        "idempotency divergence"
                    );
                    return Ok(IdempotencyVerdict {
                        test_case,
                        operation: kind,
                        classification: IdempotencyClass::Violation,
                        diverging_runs: Some((baseline.run_index, repeat.run_index)),
                        diff,
                    });
                }
            }
        }

        let classification = if comparable {
            IdempotencyClass::Idempotent
        } else {
            // No group reached two runs with identical declared inputs.
            IdempotencyClass::Indeterminate
        };

        Ok(IdempotencyVerdict {
            test_case,
            operation: kind,
            classification,
            diverging_runs: None,
            diff: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flakescan_core::model::{OperationKind, ParameterObservation, Value};

    fn read_run(test_case: &str, run_index: u32, status: &str) -> TestRun {
        let mut outcome = std::collections::BTreeMap::new();
        outcome.insert("status".to_string(), Value::Str(status.to_string()));
        TestRun {
            test_case: test_case.to_string(),
            run_index,
            parameters: Vec::new(),
            operation: OperationKind::Read,
            outcome: Value::Map(outcome),
            post_state: None,
            success: true,
            error: None,
            recorded_at_ms: None,
        }
    }

    fn with_param(mut run: TestRun, name: &str, value: Value) -> TestRun {
        run.parameters.push(ParameterObservation {
            parameter: name.to_string(),
            value,
            run_index: run.run_index,
            test_case: run.test_case.clone(),
        });
        run
    }

    fn validator() -> IdempotencyValidator {
        IdempotencyValidator::new(1e-9, VolatilityConfig::default())
    }

    #[test]
    fn matching_reads_are_idempotent() {
        // Scenario A: two READ runs both returning {"status": "ok"}.
        let runs = vec![read_run("T1", 0, "ok"), read_run("T1", 1, "ok")];
        let verdict = validator().validate(&runs, &FxHashSet::default()).unwrap();
        assert_eq!(verdict.classification, IdempotencyClass::Idempotent);
        assert!(verdict.diverging_runs.is_none());
    }

    #[test]
    fn diverging_reads_are_a_violation() {
        // Scenario B: {"status": "ok"} then {"status": "error"}.
        let runs = vec![read_run("T1", 0, "ok"), read_run("T1", 1, "error")];
        let verdict = validator().validate(&runs, &FxHashSet::default()).unwrap();
        assert_eq!(verdict.classification, IdempotencyClass::Violation);
        assert_eq!(verdict.diverging_runs, Some((0, 1)));
        assert_eq!(verdict.diff[0].path, "$.status");
    }

    #[test]
    fn single_run_is_indeterminate_without_error() {
        // Scenario D.
        let runs = vec![read_run("T1", 0, "ok")];
        let verdict = validator().validate(&runs, &FxHashSet::default()).unwrap();
        assert_eq!(verdict.classification, IdempotencyClass::Indeterminate);
    }

    #[test]
    fn differing_stable_inputs_never_share_a_group() {
        // Two runs with different declared inputs: nothing comparable.
        let runs = vec![
            with_param(read_run("T1", 0, "ok"), "page", Value::Int(1)),
            with_param(read_run("T1", 1, "error"), "page", Value::Int(2)),
        ];
        let mut stable = FxHashSet::default();
        stable.insert("page".to_string());
        let verdict = validator().validate(&runs, &stable).unwrap();
        assert_eq!(verdict.classification, IdempotencyClass::Indeterminate);
    }

    #[test]
    fn noisy_parameter_is_excluded_from_the_key() {
        // "request_id" varies per run but is noisy, so both runs land in the
        // same group and the diverging outcome is a real violation.
        let runs = vec![
            with_param(read_run("T1", 0, "ok"), "request_id", Value::Str("r-1".into())),
            with_param(read_run("T1", 1, "error"), "request_id", Value::Str("r-2".into())),
        ];
        let stable = FxHashSet::default(); // request_id classified NOISY
        let verdict = validator().validate(&runs, &stable).unwrap();
        assert_eq!(verdict.classification, IdempotencyClass::Violation);
    }

    #[test]
    fn read_verdict_is_permutation_invariant() {
        let forward = vec![read_run("T1", 0, "ok"), read_run("T1", 1, "ok"), read_run("T1", 2, "ok")];
        let mut reversed = forward.clone();
        reversed.reverse();
        let v = validator();
        let a = v.validate(&forward, &FxHashSet::default()).unwrap();
        let b = v.validate(&reversed, &FxHashSet::default()).unwrap();
        assert_eq!(a.classification, b.classification);
    }

    #[test]
    fn mixed_test_cases_are_rejected() {
        let runs = vec![read_run("T1", 0, "ok"), read_run("T2", 1, "ok")];
        match validator().validate(&runs, &FxHashSet::default()) {
            Err(ValidationError::InconsistentTestCase { expected, found }) => {
                assert_eq!(expected, "T1");
                assert_eq!(found, "T2");
            }
            other => panic!("expected InconsistentTestCase, got {other:?}"),
        }
    }

    #[test]
    fn non_crud_kind_is_rejected() {
        let mut run = read_run("T1", 0, "ok");
        run.operation = OperationKind::None;
        match validator().validate(&[run], &FxHashSet::default()) {
            Err(ValidationError::UnknownOperationKind { kind, .. }) => {
                assert_eq!(kind, "NONE");
            }
            other => panic!("expected UnknownOperationKind, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            validator().validate(&[], &FxHashSet::default()),
            Err(ValidationError::EmptyInput)
        ));
    }
}
