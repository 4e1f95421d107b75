//! Structurally comparable values.
//!
//! Every recorded input, outcome, and side-effect observation is a `Value`.
//! Equality is structural (recursive over containers), never identity, with
//! an epsilon tolerance for numeric leaves so repeated float measurements do
//! not register as noise.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

/// A recorded structured value: scalar, ordered sequence, or string-keyed map.
///
/// Untagged so the ingestion JSON maps onto it directly. Maps use `BTreeMap`
/// to keep key order deterministic for hashing and diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// One field-level disagreement found by a structural diff.
///
/// `path` is a JSONPath-style locator (`$`, `$.field`, `$[2]`). A side that
/// is `None` was absent at that path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

impl Value {
    /// Deep structural equality with numeric epsilon tolerance.
    ///
    /// Int/Int compares exactly; any other numeric pairing compares within
    /// `epsilon`. Containers recurse; kind mismatches are unequal.
    pub fn structural_eq(&self, other: &Value, epsilon: f64) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.structural_eq(y, epsilon))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|((ka, va), (kb, vb))| {
                        ka == kb && va.structural_eq(vb, epsilon)
                    })
            }
            (l, r) => match (l.as_numeric(), r.as_numeric()) {
                (Some(a), Some(b)) => (a - b).abs() <= epsilon,
                _ => false,
            },
        }
    }

    /// Structural diff against `other`.
    ///
    /// Map keys named in `volatile` are skipped at every depth — declared
    /// exemptions for generated identifiers and the like. An empty result
    /// means the two values are equal under the idempotency comparison rules.
    pub fn diff(
        &self,
        other: &Value,
        epsilon: f64,
        volatile: &FxHashSet<String>,
    ) -> Vec<DiffEntry> {
        let mut entries = Vec::new();
        diff_at("$", self, other, epsilon, volatile, &mut entries);
        entries
    }

    /// Feed a canonical byte encoding of this value into `hasher`.
    ///
    /// Kind tags keep `1` and `"1"` distinct; floats hash by bit pattern.
    pub fn hash_into(&self, hasher: &mut Xxh3) {
        match self {
            Value::Null => hasher.update(&[0x00]),
            Value::Bool(b) => {
                hasher.update(&[0x01, *b as u8]);
            }
            Value::Int(i) => {
                hasher.update(&[0x02]);
                hasher.update(&i.to_le_bytes());
            }
            Value::Float(f) => {
                hasher.update(&[0x03]);
                hasher.update(&f.to_bits().to_le_bytes());
            }
            Value::Str(s) => {
                hasher.update(&[0x04]);
                hasher.update(&(s.len() as u64).to_le_bytes());
                hasher.update(s.as_bytes());
            }
            Value::Seq(items) => {
                hasher.update(&[0x05]);
                hasher.update(&(items.len() as u64).to_le_bytes());
                for item in items {
                    item.hash_into(hasher);
                }
            }
            Value::Map(map) => {
                hasher.update(&[0x06]);
                hasher.update(&(map.len() as u64).to_le_bytes());
                for (key, value) in map {
                    hasher.update(&(key.len() as u64).to_le_bytes());
                    hasher.update(key.as_bytes());
                    value.hash_into(hasher);
                }
            }
        }
    }

    fn as_numeric(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// xxh3 signature over an ordered set of named slots.
///
/// `None` slots (parameter absent in that run) hash distinctly from every
/// present value, so absence participates in grouping.
pub fn signature_hash(slots: &[(&str, Option<&Value>)]) -> u64 {
    let mut hasher = Xxh3::new();
    for (name, value) in slots {
        hasher.update(&(name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        match value {
            Some(v) => {
                hasher.update(&[0x01]);
                v.hash_into(&mut hasher);
            }
            None => hasher.update(&[0x00]),
        }
    }
    hasher.digest()
}

fn diff_at(
    path: &str,
    left: &Value,
    right: &Value,
    epsilon: f64,
    volatile: &FxHashSet<String>,
    out: &mut Vec<DiffEntry>,
) {
    match (left, right) {
        (Value::Seq(a), Value::Seq(b)) => {
            let shared = a.len().min(b.len());
            for i in 0..shared {
                diff_at(&format!("{path}[{i}]"), &a[i], &b[i], epsilon, volatile, out);
            }
            for (i, item) in a.iter().enumerate().skip(shared) {
                out.push(DiffEntry {
                    path: format!("{path}[{i}]"),
                    left: Some(item.clone()),
                    right: None,
                });
            }
            for (i, item) in b.iter().enumerate().skip(shared) {
                out.push(DiffEntry {
                    path: format!("{path}[{i}]"),
                    left: None,
                    right: Some(item.clone()),
                });
            }
        }
        (Value::Map(a), Value::Map(b)) => {
            for (key, lv) in a {
                if volatile.contains(key) {
                    continue;
                }
                let child = format!("{path}.{key}");
                match b.get(key) {
                    Some(rv) => diff_at(&child, lv, rv, epsilon, volatile, out),
                    None => out.push(DiffEntry {
                        path: child,
                        left: Some(lv.clone()),
                        right: None,
                    }),
                }
            }
            for (key, rv) in b {
                if volatile.contains(key) || a.contains_key(key) {
                    continue;
                }
                out.push(DiffEntry {
                    path: format!("{path}.{key}"),
                    left: None,
                    right: Some(rv.clone()),
                });
            }
        }
        (l, r) => {
            if !l.structural_eq(r, epsilon) {
                out.push(DiffEntry {
                    path: path.to_string(),
                    left: Some(l.clone()),
                    right: Some(r.clone()),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn numeric_epsilon_tolerance() {
        let a = Value::Float(0.1 + 0.2);
        let b = Value::Float(0.3);
        assert!(a.structural_eq(&b, 1e-9));
        assert!(!a.structural_eq(&b, 0.0));
        // Int/Float cross-kind comparison
        assert!(Value::Int(3).structural_eq(&Value::Float(3.0), 1e-9));
    }

    #[test]
    fn kind_mismatch_is_unequal() {
        assert!(!Value::Str("1".into()).structural_eq(&Value::Int(1), 1e-9));
        assert!(!Value::Null.structural_eq(&Value::Bool(false), 1e-9));
    }

    #[test]
    fn nested_structural_equality() {
        let a = map(&[
            ("status", Value::Str("ok".into())),
            ("items", Value::Seq(vec![Value::Int(1), Value::Int(2)])),
        ]);
        let b = a.clone();
        assert!(a.structural_eq(&b, 0.0));
    }

    #[test]
    fn diff_reports_dotted_paths() {
        let a = map(&[("outer", map(&[("inner", Value::Int(1))]))]);
        let b = map(&[("outer", map(&[("inner", Value::Int(2))]))]);
        let entries = a.diff(&b, 0.0, &FxHashSet::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "$.outer.inner");
    }

    #[test]
    fn diff_skips_volatile_keys() {
        let a = map(&[("id", Value::Str("a-1".into())), ("name", Value::Str("x".into()))]);
        let b = map(&[("id", Value::Str("b-2".into())), ("name", Value::Str("x".into()))]);
        let mut volatile = FxHashSet::default();
        volatile.insert("id".to_string());
        assert!(a.diff(&b, 0.0, &volatile).is_empty());
    }

    #[test]
    fn diff_records_one_sided_keys() {
        let a = map(&[("only_left", Value::Int(1))]);
        let b = map(&[]);
        let entries = a.diff(&b, 0.0, &FxHashSet::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "$.only_left");
        assert!(entries[0].right.is_none());
    }

    #[test]
    fn signature_hash_distinguishes_absence() {
        let v = Value::Int(42);
        let present = signature_hash(&[("seed", Some(&v))]);
        let absent = signature_hash(&[("seed", None)]);
        assert_ne!(present, absent);
    }

    #[test]
    fn signature_hash_is_order_sensitive() {
        let a = Value::Int(1);
        let b = Value::Int(2);
        let ab = signature_hash(&[("x", Some(&a)), ("y", Some(&b))]);
        let ba = signature_hash(&[("y", Some(&b)), ("x", Some(&a))]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn untagged_json_round_trip() {
        let json = r#"{"status":"ok","count":3,"ratio":0.5,"tags":["a"],"meta":null}"#;
        let value: Value = serde_json::from_str(json).unwrap();
        match &value {
            Value::Map(m) => {
                assert!(matches!(m.get("count"), Some(Value::Int(3))));
                assert!(matches!(m.get("ratio"), Some(Value::Float(_))));
                assert!(matches!(m.get("meta"), Some(Value::Null)));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }
}
