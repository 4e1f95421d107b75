//! Derived analysis artifacts: noise reports, idempotency verdicts, and the
//! aggregated result crossing the export boundary.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::run::OperationKind;
use super::value::DiffEntry;

/// Noise classification for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoiseClass {
    Stable,
    Noisy,
}

/// Per-parameter noise finding. Recomputed per analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseReport {
    /// Parameter name.
    pub parameter: String,
    /// Fraction of pairwise run comparisons where the value differed, in [0,1].
    pub score: f64,
    pub classification: NoiseClass,
    /// Number of run slots scored (present + absent).
    pub samples: usize,
    /// Distinct values observed; absence counts as one distinct value.
    pub distinct_values: usize,
    /// Set when fewer than two samples existed; classification is then
    /// STABLE by convention, not by evidence.
    pub insufficient_data: bool,
}

/// Idempotency classification for a test case's operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdempotencyClass {
    Idempotent,
    Violation,
    Indeterminate,
}

/// Idempotency finding for one test case. Recomputed per analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdempotencyVerdict {
    pub test_case: String,
    pub operation: OperationKind,
    pub classification: IdempotencyClass,
    /// First diverging pair of run indices on VIOLATION.
    pub diverging_runs: Option<(u32, u32)>,
    /// Structural diff of the disagreeing fields on VIOLATION.
    #[serde(default)]
    pub diff: Vec<DiffEntry>,
}

/// Overall session outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Overall {
    Pass,
    Fail,
}

/// Session-level counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub cases_analyzed: usize,
    pub runs_analyzed: usize,
    pub duration_ms: u64,
}

/// The aggregated analysis result — the sole artifact crossing the core's
/// output boundary. External renderers (HTML/JSON, CLI exit codes) consume
/// this; the engine never renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Per-test-case noise findings.
    pub noise: FxHashMap<String, Vec<NoiseReport>>,
    /// Per-test-case idempotency verdicts.
    pub verdicts: FxHashMap<String, IdempotencyVerdict>,
    pub overall: Overall,
    pub stats: AnalysisStats,
}

impl AnalysisResult {
    /// Test cases with a VIOLATION verdict, sorted by id.
    pub fn violating_cases(&self) -> Vec<&str> {
        let mut cases: Vec<&str> = self
            .verdicts
            .iter()
            .filter(|(_, v)| v.classification == IdempotencyClass::Violation)
            .map(|(id, _)| id.as_str())
            .collect();
        cases.sort_unstable();
        cases
    }

    /// Test cases with at least one NOISY parameter, sorted by id.
    pub fn noisy_cases(&self) -> Vec<&str> {
        let mut cases: Vec<&str> = self
            .noise
            .iter()
            .filter(|(_, reports)| {
                reports.iter().any(|r| r.classification == NoiseClass::Noisy)
            })
            .map(|(id, _)| id.as_str())
            .collect();
        cases.sort_unstable();
        cases
    }
}
