//! Depth-limited pruning
//!
//! Children of the root sit at depth 0. A container at a depth that reaches
//! the limit is replaced by an empty container of the same kind; scalars
//! survive at any depth.

use serde_json::{Map, Value};

use crate::config::MAX_READ_DEPTH;

/// Clamps a requested depth to `0..=MAX_READ_DEPTH`.
pub fn clamp_depth(requested: i64) -> usize {
    requested.clamp(0, MAX_READ_DEPTH as i64) as usize
}

/// Prunes `value` below `max_depth` (clamped to `0..=8`).
pub fn limit_depth(value: &Value, max_depth: i64) -> Value {
    let max = clamp_depth(max_depth);
    match value {
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), prune(v, 0, max))).collect()),
        Value::Array(items) => Value::Array(items.iter().map(|v| prune(v, 0, max)).collect()),
        scalar => scalar.clone(),
    }
}

fn prune(value: &Value, depth: usize, max: usize) -> Value {
    match value {
        Value::Object(_) if depth >= max => Value::Object(Map::new()),
        Value::Array(_) if depth >= max => Value::Array(Vec::new()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), prune(v, depth + 1, max)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| prune(v, depth + 1, max)).collect()),
        scalar => scalar.clone(),
    }
}
