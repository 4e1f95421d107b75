//! Flakescan data model.
//!
//! `Value` is the structurally comparable payload type shared by every
//! analyzer. `TestRun` is the ingestion-side record; the report types are
//! derived per analysis session and carry no independent lifecycle.

pub mod report;
pub mod run;
pub mod value;

pub use report::{
    AnalysisResult, AnalysisStats, IdempotencyClass, IdempotencyVerdict, NoiseClass,
    NoiseReport, Overall,
};
pub use run::{OperationKind, ParameterObservation, TestRun};
pub use value::{signature_hash, DiffEntry, Value};
