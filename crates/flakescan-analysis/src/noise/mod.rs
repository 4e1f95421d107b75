//! Parameter noise analysis.

pub mod analyzer;

pub use analyzer::{stable_parameters, NoiseAnalyzer};
