//! Recorded test runs.

use serde::{Deserialize, Serialize};

use super::value::Value;

/// CRUD classification of the operation a test exercises.
///
/// `None` marks tests outside the CRUD contract; they receive noise analysis
/// but are rejected by the idempotency validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
    None,
}

impl OperationKind {
    /// Whether this kind participates in idempotency validation.
    pub fn is_crud(self) -> bool {
        !matches!(self, OperationKind::None)
    }
}

/// A single recorded input parameter for one run. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterObservation {
    /// Parameter name (dotted path for nested inputs).
    pub parameter: String,
    /// Recorded value, structurally comparable.
    pub value: Value,
    /// Run this observation belongs to.
    pub run_index: u32,
    /// Owning test case id.
    pub test_case: String,
}

/// One recorded execution of a test case.
///
/// Created at ingestion by the record store, never mutated afterwards, and
/// retained for the lifetime of one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    /// Test case id.
    pub test_case: String,
    /// 0-based run index; contiguous per test case.
    pub run_index: u32,
    /// Ordered input observations.
    #[serde(default)]
    pub parameters: Vec<ParameterObservation>,
    /// CRUD classification of the exercised operation.
    pub operation: OperationKind,
    /// Result payload of the run.
    pub outcome: Value,
    /// Side-effect observation on the target resource after the operation,
    /// when the adapter captured one. Absent for pure reads with no probe.
    #[serde(default)]
    pub post_state: Option<Value>,
    /// Whether the run itself succeeded.
    pub success: bool,
    /// Failure detail when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
    /// Wall-clock capture time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub recorded_at_ms: Option<u64>,
}

impl TestRun {
    /// Look up a parameter observation by name.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|obs| obs.parameter == name)
            .map(|obs| &obs.value)
    }
}
