//! Record ingestion and lookup.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use flakescan_core::errors::StoreError;
use flakescan_core::model::TestRun;

use crate::session::{CaseSession, CaseState};

/// In-memory store of recorded runs, keyed by test case id.
///
/// Built once per analysis session from a fixed batch; sessions are frozen at
/// ingestion and only their lifecycle state changes afterwards.
#[derive(Debug, Default)]
pub struct RecordStore {
    sessions: FxHashMap<String, CaseSession>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a batch of recorded runs.
    ///
    /// Groups runs by test case, validates required fields and the run index
    /// invariant (unique, contiguous, starting at 0), sorts each sequence by
    /// run index, and freezes the sessions. Fails closed on the first
    /// malformed record.
    pub fn ingest(&mut self, runs: Vec<TestRun>) -> Result<(), StoreError> {
        let mut grouped: FxHashMap<String, Vec<TestRun>> = FxHashMap::default();
        for run in runs {
            if run.test_case.is_empty() {
                return Err(StoreError::MissingField {
                    test_case: format!("<run {}>", run.run_index),
                    field: "test_case".to_string(),
                });
            }
            grouped.entry(run.test_case.clone()).or_default().push(run);
        }

        for (test_case, mut case_runs) in grouped {
            case_runs.sort_by_key(|r| r.run_index);
            validate_run_sequence(&test_case, &case_runs)?;
            debug!(
                test_case = %test_case,
                runs = case_runs.len(),
                "ingested run sequence"
            );
            self.sessions
                .insert(test_case.clone(), CaseSession::new(test_case, case_runs));
        }

        Ok(())
    }

    /// Load a batch from a JSON file holding an ordered array of runs —
    /// the serialization boundary the external test-execution adapter
    /// writes to.
    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let runs: Vec<TestRun> =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let mut store = Self::new();
        store.ingest(runs)?;
        Ok(store)
    }

    /// Load a batch from any reader producing the same JSON shape.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let runs: Vec<TestRun> =
            serde_json::from_reader(reader).map_err(|e| StoreError::Parse {
                path: "<reader>".to_string(),
                message: e.to_string(),
            })?;
        let mut store = Self::new();
        store.ingest(runs)?;
        Ok(store)
    }

    /// Test case ids, sorted for deterministic iteration.
    pub fn cases(&self) -> Vec<&str> {
        let mut cases: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        cases.sort_unstable();
        cases
    }

    /// Runs for one test case, ordered by run index.
    pub fn runs(&self, test_case: &str) -> Option<&[TestRun]> {
        self.sessions.get(test_case).map(|s| s.runs())
    }

    pub fn state(&self, test_case: &str) -> Option<CaseState> {
        self.sessions.get(test_case).map(|s| s.state())
    }

    /// Transition a case to ANALYZED after its findings are computed.
    pub fn mark_analyzed(&mut self, test_case: &str) {
        if let Some(session) = self.sessions.get_mut(test_case) {
            session.mark_analyzed();
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Total run count across all cases.
    pub fn total_runs(&self) -> usize {
        self.sessions.values().map(|s| s.runs().len()).sum()
    }
}

/// Enforce the run index invariant on a sequence sorted by run index.
fn validate_run_sequence(test_case: &str, runs: &[TestRun]) -> Result<(), StoreError> {
    let mut expected: u32 = 0;
    for run in runs {
        if run.run_index == expected {
            expected += 1;
        } else if expected > 0 && run.run_index == expected - 1 {
            return Err(StoreError::DuplicateRunIndex {
                test_case: test_case.to_string(),
                run_index: run.run_index,
            });
        } else {
            return Err(StoreError::NonContiguousRunIndex {
                test_case: test_case.to_string(),
                expected,
                found: run.run_index,
            });
        }
    }
    Ok(())
}
