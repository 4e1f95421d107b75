//! Per-test-case sessions.

use flakescan_core::model::TestRun;

/// Lifecycle of a test case within one analysis session.
///
/// Single forward transition: COLLECTING → ANALYZED. Analysis is single-pass
/// over a fixed batch; there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    Collecting,
    Analyzed,
}

/// The frozen run sequence for one test case.
#[derive(Debug, Clone)]
pub struct CaseSession {
    test_case: String,
    runs: Vec<TestRun>,
    state: CaseState,
}

impl CaseSession {
    /// Create a session over runs already sorted by run index.
    pub(crate) fn new(test_case: String, runs: Vec<TestRun>) -> Self {
        Self {
            test_case,
            runs,
            state: CaseState::Collecting,
        }
    }

    pub fn test_case(&self) -> &str {
        &self.test_case
    }

    /// Runs ordered by run index. Read-only for the session lifetime.
    pub fn runs(&self) -> &[TestRun] {
        &self.runs
    }

    pub fn state(&self) -> CaseState {
        self.state
    }

    /// Transition COLLECTING → ANALYZED. Idempotent on repeat.
    pub fn mark_analyzed(&mut self) {
        self.state = CaseState::Analyzed;
    }
}
