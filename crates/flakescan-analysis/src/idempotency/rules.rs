//! Operation-kind comparison rules.
//!
//! Each CRUD kind has its own notion of "same observable outcome" when the
//! operation is applied again. The rules are pure functions over a pair of
//! runs dispatched through an explicit table (the match below) — no
//! inheritance, no shared state.

use rustc_hash::FxHashSet;

use flakescan_core::model::{DiffEntry, OperationKind, TestRun, Value};

/// Compare a repeat run against the group baseline under `kind`'s rule.
///
/// Returns the structural diff of the disagreeing fields; empty means the
/// pair is idempotent-equivalent. `volatile` holds the declared exemptions
/// for this kind (e.g. generated identifiers on CREATE).
pub fn compare(
    kind: OperationKind,
    baseline: &TestRun,
    repeat: &TestRun,
    epsilon: f64,
    volatile: &FxHashSet<String>,
) -> Vec<DiffEntry> {
    match kind {
        // READ: raw outcomes must agree across every run in the group.
        OperationKind::Read => baseline.outcome.diff(&repeat.outcome, epsilon, volatile),

        // CREATE: the comparison key is the effect observed on the target
        // resource, not the raw output — a second CREATE may legitimately
        // return a different generated identifier when the field is declared
        // volatile. Without a recorded post-state the outcome stands in,
        // still under the volatile exemptions.
        // UPDATE: the post-condition state must equal the state produced by
        // a single application.
        OperationKind::Create | OperationKind::Update => {
            compare_states(baseline, repeat, epsilon, volatile, false)
        }

        // DELETE: repeating must not error, and the terminal state must
        // match — already-deleted is equivalent to deleted.
        OperationKind::Delete => {
            let mut entries = Vec::new();
            if !repeat.success {
                entries.push(DiffEntry {
                    path: "$.success".to_string(),
                    left: Some(Value::Bool(baseline.success)),
                    right: Some(Value::Bool(repeat.success)),
                });
            }
            entries.extend(compare_states(baseline, repeat, epsilon, volatile, true));
            entries
        }

        // Callers reject NONE before dispatch; an empty diff here would
        // silently report idempotency, so flag the whole record instead.
        OperationKind::None => vec![DiffEntry {
            path: "$".to_string(),
            left: None,
            right: None,
        }],
    }
}

/// Compare side-effect observations, falling back to outcomes when neither
/// run recorded a post-state.
///
/// With `absent_is_deleted`, a missing or null post-state counts as "resource
/// gone" and two gone sides agree regardless of outcome payloads.
fn compare_states(
    baseline: &TestRun,
    repeat: &TestRun,
    epsilon: f64,
    volatile: &FxHashSet<String>,
    absent_is_deleted: bool,
) -> Vec<DiffEntry> {
    let left = normalize(baseline.post_state.as_ref(), absent_is_deleted);
    let right = normalize(repeat.post_state.as_ref(), absent_is_deleted);

    match (left, right) {
        (Some(l), Some(r)) => l.diff(r, epsilon, volatile),
        (None, None) => {
            if absent_is_deleted {
                // Both terminal states are "gone": equivalent.
                Vec::new()
            } else {
                baseline.outcome.diff(&repeat.outcome, epsilon, volatile)
            }
        }
        (l, r) => vec![DiffEntry {
            path: "$.post_state".to_string(),
            left: l.cloned(),
            right: r.cloned(),
        }],
    }
}

fn normalize(state: Option<&Value>, absent_is_deleted: bool) -> Option<&Value> {
    match state {
        Some(Value::Null) if absent_is_deleted => None,
        other => other,
    }
}
