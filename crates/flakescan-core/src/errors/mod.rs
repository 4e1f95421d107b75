//! Error handling for Flakescan.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//! The engine fails closed: malformed input is a typed error, never a
//! best-effort verdict.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod store_error;
pub mod validation_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use error_code::FlakescanErrorCode;
pub use pipeline_error::PipelineError;
pub use store_error::StoreError;
pub use validation_error::ValidationError;
