//! Field projection (`fields=id,title,seo.description`)

use serde_json::{Map, Value};

use crate::entry::EntryRecord;

/// Keys resolved from entry metadata instead of `data`.
pub const METADATA_KEYS: [&str; 4] = ["id", "created_at", "updated_at", "published_at"];

/// Returns a flat map holding only the requested keys.
///
/// Metadata keys come from the record itself; everything else is a dotted
/// path into `data`, where numeric segments index arrays. Paths that do not
/// resolve are omitted.
pub fn project(entry: &EntryRecord, fields_csv: &str) -> Map<String, Value> {
    let mut out = Map::new();

    for key in parse_field_list(fields_csv) {
        if out.contains_key(&key) {
            continue;
        }

        let value = if METADATA_KEYS.contains(&key.as_str()) {
            entry.metadata(&key)
        } else {
            lookup(&entry.data, &key).cloned()
        };

        if let Some(value) = value {
            out.insert(key, value);
        }
    }

    out
}

/// Splits a comma-separated key list, dropping blanks.
pub fn parse_field_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn lookup<'v>(data: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}
