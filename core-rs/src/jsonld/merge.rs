//! Precedence-aware recursive merge of JSON objects
//!
//! For every key of either input:
//! 1. both values are objects: merge them recursively;
//! 2. the first input holds a non-null value: it wins outright;
//! 3. otherwise the second input's value is taken.
//!
//! A `null` in the first input with no counterpart in the second is kept, so
//! every key of either input survives the merge.

use serde_json::{Map, Value};

/// Merge `d2` under `d1`; `d1` shadows `d2` on every non-object conflict
pub fn merge(d1: &Map<String, Value>, d2: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();

    for key in d1.keys().chain(d2.keys()) {
        if merged.contains_key(key) {
            continue;
        }

        let value = match (d1.get(key), d2.get(key)) {
            (Some(Value::Object(left)), Some(Value::Object(right))) => {
                Value::Object(merge(left, right))
            }
            (Some(left), _) if !left.is_null() => left.clone(),
            (_, Some(right)) => right.clone(),
            (Some(left), None) => left.clone(),
            (None, None) => unreachable!("key '{}' taken from the union of both maps", key),
        };

        merged.insert(key.clone(), value);
    }

    merged
}
