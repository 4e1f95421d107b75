//! Analysis engine for recorded test executions.
//!
//! Three cooperating stages over an immutable batch of runs:
//! - [`noise`] scores each input parameter by how often its value changed
//!   across repeated runs and classifies it STABLE or NOISY;
//! - [`idempotency`] replays the "apply twice" comparison per CRUD operation
//!   kind, keyed only on the STABLE parameters so noisy inputs cannot fake a
//!   violation;
//! - [`aggregate`] merges both findings into the exportable
//!   [`AnalysisResult`](flakescan_core::model::AnalysisResult).
//!
//! [`pipeline`] wires the stages together with per-test-case rayon fan-out.

pub mod aggregate;
pub mod idempotency;
pub mod noise;
pub mod pipeline;

pub use aggregate::Aggregator;
pub use idempotency::IdempotencyValidator;
pub use noise::{stable_parameters, NoiseAnalyzer};
pub use pipeline::AnalysisPipeline;
