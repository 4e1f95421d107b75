//! Core types, traits, errors, config, and tracing for the Flakescan
//! analysis engine.
//!
//! Flakescan analyzes recorded test executions for two defect classes:
//! noisy input parameters (values that vary across repeated runs without
//! being controlled by the test) and idempotency violations in CRUD-style
//! operations. This crate holds the shared data model and ambient
//! infrastructure; the analysis algorithms live in `flakescan-analysis`.

pub mod config;
pub mod errors;
pub mod model;
pub mod trace;
