//! Pipeline errors.

use super::analysis_error::AnalysisError;
use super::error_code::FlakescanErrorCode;
use super::store_error::StoreError;
use super::validation_error::ValidationError;

/// Errors surfaced by the end-to-end analysis pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FlakescanErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Analysis(e) => e.error_code(),
            PipelineError::Validation(e) => e.error_code(),
            PipelineError::Store(e) => e.error_code(),
        }
    }
}
