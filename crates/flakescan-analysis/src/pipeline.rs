//! End-to-end analysis pipeline.
//!
//! Record store → {noise analyzer, idempotency validator} → aggregator.
//! Test cases are independent, so the fan-out runs on rayon and results are
//! partitioned per case then merged into the aggregator's maps — no
//! interleaved writes to a shared key.

use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use flakescan_core::config::FlakescanConfig;
use flakescan_core::errors::PipelineError;
use flakescan_core::model::{AnalysisResult, AnalysisStats, IdempotencyVerdict, NoiseReport};
use flakescan_store::RecordStore;

use crate::aggregate::Aggregator;
use crate::idempotency::IdempotencyValidator;
use crate::noise::{stable_parameters, NoiseAnalyzer};

/// Findings for one test case before merging.
struct CaseFindings {
    test_case: String,
    noise: Vec<NoiseReport>,
    verdict: Option<IdempotencyVerdict>,
}

/// Single-pass pipeline over a frozen record store.
pub struct AnalysisPipeline {
    config: FlakescanConfig,
}

impl AnalysisPipeline {
    pub fn new(config: FlakescanConfig) -> Self {
        Self { config }
    }

    /// Analyze every test case in the store and aggregate the findings.
    ///
    /// Cases whose operation kind is NONE receive noise analysis only; the
    /// validator is fed CRUD-tagged cases exclusively. Any per-case error
    /// aborts the whole batch — the engine never emits a partial result for
    /// malformed input.
    pub fn run(&self, store: &mut RecordStore) -> Result<AnalysisResult, PipelineError> {
        let start = Instant::now();
        let threshold = self.config.analysis.effective_noise_threshold();
        let epsilon = self.config.analysis.effective_epsilon();

        let analyzer = NoiseAnalyzer::new(epsilon);
        let validator = IdempotencyValidator::new(epsilon, self.config.volatility.clone());

        let cases: Vec<String> = store.cases().iter().map(|c| c.to_string()).collect();
        info!(cases = cases.len(), runs = store.total_runs(), "analysis started");

        let snapshot: &RecordStore = store;
        let findings: Vec<CaseFindings> = cases
            .par_iter()
            .map(|case| self.analyze_case(snapshot, &analyzer, &validator, case, threshold))
            .collect::<Result<Vec<_>, PipelineError>>()?
            .into_iter()
            .flatten()
            .collect();

        // Partition-then-merge: each case owns its key, so sequential
        // insertion after the parallel phase is race-free.
        let mut noise_map: FxHashMap<String, Vec<NoiseReport>> = FxHashMap::default();
        let mut verdict_map: FxHashMap<String, IdempotencyVerdict> = FxHashMap::default();
        for finding in findings {
            if let Some(verdict) = finding.verdict {
                verdict_map.insert(finding.test_case.clone(), verdict);
            }
            noise_map.insert(finding.test_case, finding.noise);
        }

        for case in &cases {
            store.mark_analyzed(case);
        }

        let stats = AnalysisStats {
            cases_analyzed: cases.len(),
            runs_analyzed: store.total_runs(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        let aggregator = Aggregator::new(self.config.analysis.effective_noise_blocking());
        let result = aggregator.aggregate(noise_map, verdict_map, stats);
        info!(
            overall = ?result.overall,
            duration_ms = result.stats.duration_ms,
            "analysis complete"
        );
        Ok(result)
    }

    fn analyze_case(
        &self,
        store: &RecordStore,
        analyzer: &NoiseAnalyzer,
        validator: &IdempotencyValidator,
        case: &str,
        threshold: f64,
    ) -> Result<Option<CaseFindings>, PipelineError> {
        let Some(runs) = store.runs(case) else {
            return Ok(None);
        };

        let noise = analyzer.analyze(runs, threshold)?;

        // Ingestion guarantees a non-empty, ordered sequence per case.
        let verdict = match runs.first() {
            Some(first) if first.operation.is_crud() => {
                let stable = stable_parameters(&noise);
                Some(validator.validate(runs, &stable)?)
            }
            _ => None,
        };

        debug!(
            test_case = case,
            parameters = noise.len(),
            crud = verdict.is_some(),
            "case analyzed"
        );

        Ok(Some(CaseFindings {
            test_case: case.to_string(),
            noise,
            verdict,
        }))
    }
}
