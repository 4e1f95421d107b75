//! Analysis aggregation.
//!
//! Merges per-test-case noise and idempotency findings into the single
//! `AnalysisResult` crossing the export boundary. No algorithmic content
//! beyond the pass/fail rule; this module exists because it defines the
//! final contract surface to external report renderers.

use rustc_hash::FxHashMap;

use flakescan_core::model::{
    AnalysisResult, AnalysisStats, IdempotencyClass, IdempotencyVerdict, NoiseClass,
    NoiseReport, Overall,
};

#[derive(Debug, Clone)]
pub struct Aggregator {
    noise_blocking: bool,
}

impl Aggregator {
    /// `noise_blocking` is the configured blocking-severity flag: when set,
    /// a NOISY parameter fails the session even without a violation.
    pub fn new(noise_blocking: bool) -> Self {
        Self { noise_blocking }
    }

    /// Merge findings into the exportable result.
    ///
    /// FAIL when any test case holds a VIOLATION verdict, or — with noise
    /// marked blocking — any parameter classified NOISY. Empty findings are
    /// a PASS.
    pub fn aggregate(
        &self,
        noise: FxHashMap<String, Vec<NoiseReport>>,
        verdicts: FxHashMap<String, IdempotencyVerdict>,
        stats: AnalysisStats,
    ) -> AnalysisResult {
        let any_violation = verdicts
            .values()
            .any(|v| v.classification == IdempotencyClass::Violation);
        let any_noisy = noise
            .values()
            .flatten()
            .any(|r| r.classification == NoiseClass::Noisy);

        let overall = if any_violation || (self.noise_blocking && any_noisy) {
            Overall::Fail
        } else {
            Overall::Pass
        };

        AnalysisResult {
            noise,
            verdicts,
            overall,
            stats,
        }
    }
}
