//! Idempotency validation errors.

use super::error_code::{self, FlakescanErrorCode};

/// Errors raised by the idempotency validator.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown operation kind {kind} for test case {test_case}: expected CREATE, READ, UPDATE, or DELETE")]
    UnknownOperationKind { test_case: String, kind: String },

    #[error("Inconsistent test case: expected {expected}, found {found}")]
    InconsistentTestCase { expected: String, found: String },

    #[error("Empty input: no runs supplied for validation")]
    EmptyInput,
}

impl FlakescanErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_ERROR
    }
}
