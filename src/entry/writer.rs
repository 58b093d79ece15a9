//! Write path
//!
//! `payload → envelope check + EntryValidator → EntryNormalizer → PreparedEntry`.
//!
//! Envelope violations (`status`, `published_at`) land in the same error map
//! as field violations, so a rejected write reports everything at once.
//! Persisting the prepared entry, and serializing concurrent writes to the
//! same entry, is the caller's job.

use serde_json::{Map, Value};

use super::payload::{EntryStatus, PreparedEntry};
use crate::errors::{ContentError, ContentResult};
use crate::normalize::EntryNormalizer;
use crate::schema::Schema;
use crate::validation::{date_like, EntryValidator, ValidationContext, ValidationErrors};

/// Runs validation and normalization for one entry write.
pub struct EntryWriter<'c, 'a> {
    ctx: &'c ValidationContext<'a>,
}

/// Checked envelope fields of a write payload.
struct Envelope {
    status: EntryStatus,
    published_at: Option<String>,
}

impl<'c, 'a> EntryWriter<'c, 'a> {
    pub fn new(ctx: &'c ValidationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Validates and normalizes `payload` against the current `schema`.
    ///
    /// `previous` is the stored data of the entry being updated, if any.
    ///
    /// # Errors
    ///
    /// - `ContentError::Validation` with envelope and field violations merged
    /// - `ContentError::Collaborator` / `ContentError::Normalization` (fatal)
    pub fn prepare(
        &self,
        schema: &Schema,
        payload: &Value,
        previous: Option<&Map<String, Value>>,
    ) -> ContentResult<PreparedEntry> {
        let Some(payload) = payload.as_object() else {
            return Err(ValidationErrors::single("payload", "The payload must be an object.").into());
        };

        let (envelope, mut errors) = check_envelope(payload);

        let empty = Value::Object(Map::new());
        let data = match payload.get("data") {
            None | Some(Value::Null) => &empty,
            Some(data) => data,
        };

        let validator = EntryValidator::new(self.ctx).with_previous(previous);
        let validated = match validator.validate_schema(schema, data) {
            Ok(validated) => validated,
            Err(ContentError::Validation(field_errors)) => {
                errors.merge(field_errors);
                return Err(errors.into());
            }
            Err(fatal) => return Err(fatal),
        };

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let data = EntryNormalizer::new(self.ctx).normalize_schema(schema, &validated, previous)?;

        Ok(PreparedEntry {
            status: envelope.status,
            published_at: envelope.published_at,
            data,
        })
    }
}

fn check_envelope(payload: &Map<String, Value>) -> (Envelope, ValidationErrors) {
    let mut errors = ValidationErrors::new();

    let status = match payload.get("status") {
        None | Some(Value::Null) => EntryStatus::default(),
        Some(raw) => match raw.as_str().and_then(EntryStatus::parse) {
            Some(status) => status,
            None => {
                errors.add(
                    "status",
                    format!("The status must be one of: {}.", EntryStatus::ALLOWED.join(", ")),
                );
                EntryStatus::default()
            }
        },
    };

    let published_at = match payload.get("published_at") {
        None | Some(Value::Null) => None,
        Some(raw) => match date_like(raw, "published at") {
            Ok(()) => raw.as_str().map(str::to_string),
            Err(message) => {
                errors.add("published_at", message);
                None
            }
        },
    };

    (Envelope { status, published_at }, errors)
}
