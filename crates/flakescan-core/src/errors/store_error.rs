//! Record store errors.

use super::error_code::{self, FlakescanErrorCode};

/// Errors raised while ingesting recorded runs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Malformed record for test case {test_case}: missing required field {field}")]
    MissingField { test_case: String, field: String },

    #[error("Malformed record for test case {test_case}: run indices must be contiguous from 0, found {found} where {expected} was expected")]
    NonContiguousRunIndex {
        test_case: String,
        expected: u32,
        found: u32,
    },

    #[error("Malformed record for test case {test_case}: duplicate run index {run_index}")]
    DuplicateRunIndex { test_case: String, run_index: u32 },

    #[error("Failed to read record file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse record file {path}: {message}")]
    Parse { path: String, message: String },
}

impl StoreError {
    /// Whether this is one of the `MalformedRecord` shapes (as opposed to an
    /// I/O or parse failure on the record file itself).
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            StoreError::MissingField { .. }
                | StoreError::NonContiguousRunIndex { .. }
                | StoreError::DuplicateRunIndex { .. }
        )
    }
}

impl FlakescanErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        error_code::STORE_ERROR
    }
}
