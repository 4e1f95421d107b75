//! Noise analysis errors.

use super::error_code::{self, FlakescanErrorCode};

/// Errors raised by the parameter noise analyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid noise threshold {0}: must be within [0.0, 1.0]")]
    InvalidThreshold(f64),

    #[error("Empty input: no runs supplied for analysis")]
    EmptyInput,
}

impl FlakescanErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        error_code::ANALYSIS_ERROR
    }
}
