//! Execution record store.
//!
//! Holds, per test case, the ordered sequence of recorded runs for one
//! analysis session. An external test-execution adapter produces the records
//! (the store only consumes them — it never executes tests) and ingestion
//! validates them up front: a malformed record is a typed `StoreError`, never
//! a silently repaired session.

pub mod session;
pub mod store;

pub use session::{CaseSession, CaseState};
pub use store::RecordStore;
