//! Entry payloads
//!
//! Write payload: `{status?, published_at?, data}`.
//! Read payload: `{id, status, published_at, data}` plus the timestamps the
//! storage layer maintains.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Publication state of an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Draft,
    Published,
}

impl EntryStatus {
    pub const ALLOWED: [&'static str; 2] = ["draft", "published"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Published => "published",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(EntryStatus::Draft),
            "published" => Some(EntryStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated and normalized entry, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedEntry {
    pub status: EntryStatus,
    pub published_at: Option<String>,
    pub data: Map<String, Value>,
}

/// A stored entry as handed to the read path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: i64,

    #[serde(default)]
    pub status: EntryStatus,

    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub data: Map<String, Value>,
}

impl EntryRecord {
    pub fn new(id: i64, data: Map<String, Value>) -> Self {
        Self {
            id,
            status: EntryStatus::Draft,
            published_at: None,
            created_at: None,
            updated_at: None,
            data,
        }
    }

    /// Entry metadata addressable by name on reads.
    pub fn metadata(&self, key: &str) -> Option<Value> {
        let timestamp = |t: &Option<String>| t.clone().map(Value::String).unwrap_or(Value::Null);
        match key {
            "id" => Some(Value::from(self.id)),
            "created_at" => Some(timestamp(&self.created_at)),
            "updated_at" => Some(timestamp(&self.updated_at)),
            "published_at" => Some(timestamp(&self.published_at)),
            _ => None,
        }
    }

    /// The read payload with `data` replaced.
    pub fn to_value_with(&self, data: Value) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), Value::from(self.id));
        out.insert("status".into(), Value::String(self.status.as_str().to_string()));
        out.insert("published_at".into(), self.metadata("published_at").unwrap_or(Value::Null));
        if let Some(created) = &self.created_at {
            out.insert("created_at".into(), Value::String(created.clone()));
        }
        if let Some(updated) = &self.updated_at {
            out.insert("updated_at".into(), Value::String(updated.clone()));
        }
        out.insert("data".into(), data);
        Value::Object(out)
    }
}
