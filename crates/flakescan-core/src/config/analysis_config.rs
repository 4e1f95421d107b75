//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the analysis subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Noise threshold: a parameter is NOISY when its score exceeds this.
    /// Default: 0.1.
    pub noise_threshold: Option<f64>,
    /// Numeric equality tolerance for structural comparison. Default: 1e-9.
    pub epsilon: Option<f64>,
    /// When true, any NOISY parameter fails the overall session even without
    /// an idempotency violation. Default: false (noise never blocks unless
    /// explicitly marked).
    pub noise_blocking: Option<bool>,
}

impl AnalysisConfig {
    /// Returns the effective noise threshold, defaulting to 0.1.
    pub fn effective_noise_threshold(&self) -> f64 {
        self.noise_threshold.unwrap_or(0.1)
    }

    /// Returns the effective numeric epsilon, defaulting to 1e-9.
    pub fn effective_epsilon(&self) -> f64 {
        self.epsilon.unwrap_or(1e-9)
    }

    /// Returns the effective blocking-severity flag, defaulting to false.
    pub fn effective_noise_blocking(&self) -> bool {
        self.noise_blocking.unwrap_or(false)
    }
}
