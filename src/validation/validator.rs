//! Entry validator
//!
//! Validation semantics:
//! - Rules derive from each field's variant; see [`super::rules`]
//! - `required` fields must be present and non-null
//! - Undeclared keys are dropped from the validated output
//! - Nested schemas (repeater, layout) are validated by recursive descent
//! - Every violation is collected; any violation rejects the whole entry
//!
//! Collaborator failures (existence lookups) abort validation immediately and
//! are reported as fatal, never folded into the error map.
//!
//! On update, a required password is satisfied by the hash already stored in
//! the previous document, so leaving it out keeps the old secret.

use serde_json::{Map, Value};

use super::context::ValidationContext;
use super::errors::ValidationErrors;
use super::rules::{self, RuleResult};
use crate::errors::{ContentError, ContentResult};
use crate::observability::{log_event, Event, Logger};
use crate::providers::CollaboratorResult;
use crate::schema::{FieldDescriptor, FieldKind, Schema};

/// Entry data that passed validation: declared fields only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedDocument {
    data: Map<String, Value>,
}

impl ValidatedDocument {
    /// Wraps data that is already known to satisfy its schema.
    pub(crate) fn trusted(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, handle: &str) -> Option<&Value> {
        self.data.get(handle)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }
}

/// Accepted value of a subtree plus every violation found beneath it.
pub(super) struct Checked<T> {
    pub(super) value: T,
    pub(super) errors: ValidationErrors,
}

impl Checked<Option<Value>> {
    pub(super) fn valid(value: Value) -> Self {
        Self {
            value: Some(value),
            errors: ValidationErrors::new(),
        }
    }

    pub(super) fn absent(value: Option<Value>) -> Self {
        Self {
            value,
            errors: ValidationErrors::new(),
        }
    }

    pub(super) fn fail(path: &str, message: impl Into<String>) -> Self {
        Self {
            value: None,
            errors: ValidationErrors::single(path, message),
        }
    }

    pub(super) fn with_errors(value: Value, errors: ValidationErrors) -> Self {
        Self {
            value: Some(value),
            errors,
        }
    }

    fn from_rule(value: &Value, path: &str, result: RuleResult) -> Self {
        match result {
            Ok(()) => Self::valid(value.clone()),
            Err(message) => Self::fail(path, message),
        }
    }
}

/// Validates entry documents against compiled field lists.
pub struct EntryValidator<'c, 'a> {
    pub(super) ctx: &'c ValidationContext<'a>,
    previous: Option<&'c Map<String, Value>>,
}

impl<'c, 'a> EntryValidator<'c, 'a> {
    pub fn new(ctx: &'c ValidationContext<'a>) -> Self {
        Self { ctx, previous: None }
    }

    /// Validates an update of the entry whose stored data is `previous`.
    pub fn with_previous(mut self, previous: Option<&'c Map<String, Value>>) -> Self {
        self.previous = previous;
        self
    }

    /// Validates `document` against the schema's field list.
    pub fn validate_schema(&self, schema: &Schema, document: &Value) -> ContentResult<ValidatedDocument> {
        self.validate(&schema.fields, document)
    }

    /// Validates `document` against `fields`.
    ///
    /// # Errors
    ///
    /// - `ContentError::Validation` with the full path → messages map
    /// - `ContentError::Collaborator` if an existence lookup failed
    pub fn validate(&self, fields: &[FieldDescriptor], document: &Value) -> ContentResult<ValidatedDocument> {
        let result = self.validate_inner(fields, document);

        let space = self.ctx.space().to_string();
        match &result {
            Ok(validated) => {
                let count = validated.as_map().len().to_string();
                Logger::info(Event::EntryValidated.as_str(), &[("fields", &count), ("space", &space)]);
            }
            Err(ContentError::Validation(errors)) => {
                let count = errors.len().to_string();
                Logger::warn(Event::EntryRejected.as_str(), &[("errors", &count), ("space", &space)]);
            }
            Err(err) => {
                let reason = err.to_string();
                log_event(Event::CollaboratorFailed, &[("reason", &reason), ("space", &space)]);
            }
        }

        result
    }

    fn validate_inner(&self, fields: &[FieldDescriptor], document: &Value) -> ContentResult<ValidatedDocument> {
        let Some(doc) = document.as_object() else {
            return Err(ValidationErrors::single("data", "The data field must be an object.").into());
        };

        let checked = self.check_fields(fields, doc, "")?;
        if checked.errors.is_empty() {
            Ok(ValidatedDocument { data: checked.value })
        } else {
            Err(checked.errors.into())
        }
    }

    /// Validates one level of a document; `prefix` is the path of the level.
    pub(super) fn check_fields(
        &self,
        fields: &[FieldDescriptor],
        doc: &Map<String, Value>,
        prefix: &str,
    ) -> CollaboratorResult<Checked<Map<String, Value>>> {
        let mut value = Map::new();
        let mut errors = ValidationErrors::new();

        // Stored values only exist for top-level fields.
        let previous = if prefix.is_empty() { self.previous } else { None };

        for field in fields {
            let path = join_path(prefix, &field.handle);
            let stored = previous.and_then(|p| p.get(&field.handle));
            let checked = self.check_field(field, doc.get(&field.handle), stored, &path)?;
            if let Some(accepted) = checked.value {
                value.insert(field.handle.clone(), accepted);
            }
            errors.merge(checked.errors);
        }

        Ok(Checked { value, errors })
    }

    fn check_field(
        &self,
        field: &FieldDescriptor,
        value: Option<&Value>,
        stored: Option<&Value>,
        path: &str,
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let supplied = match value {
            Some(v) if !is_absent(field, v) => v,
            _ if field.required && !keeps_stored(field, stored) => {
                return Ok(Checked::fail(path, format!("The {} field is required.", field.label)));
            }
            _ => return Ok(Checked::absent(value.cloned())),
        };

        match supplied {
            Value::Object(locales) if field.localized => self.check_locales(field, locales, path),
            _ => self.check_value(field, supplied, path),
        }
    }

    /// Each entry of a `locale -> value` map is checked like a bare value.
    fn check_locales(
        &self,
        field: &FieldDescriptor,
        locales: &Map<String, Value>,
        path: &str,
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let mut errors = ValidationErrors::new();

        for (locale, value) in locales {
            if locale.trim().is_empty() {
                errors.add(path, format!("The {} field has an empty locale key.", field.label));
                continue;
            }
            if value.is_null() {
                continue;
            }
            let checked = self.check_value(field, value, &join_path(path, locale))?;
            errors.merge(checked.errors);
        }

        Ok(Checked::with_errors(Value::Object(locales.clone()), errors))
    }

    fn check_value(
        &self,
        field: &FieldDescriptor,
        value: &Value,
        path: &str,
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let label = field.label.as_str();
        let rule = |result: RuleResult| Checked::from_rule(value, path, result);

        let checked = match &field.kind {
            FieldKind::Text | FieldKind::Textarea | FieldKind::Richtext => {
                rule(rules::string(value, label).map(|_| ()))
            }
            FieldKind::Number => rule(rules::numeric(value, label)),
            FieldKind::Boolean => rule(rules::boolean(value, label)),
            FieldKind::Date | FieldKind::Datetime => rule(rules::date_like(value, label)),
            FieldKind::Time => rule(rules::time(value, label)),
            FieldKind::Json => rule(rules::json(value, label)),
            FieldKind::Select { options } | FieldKind::Radio { options } | FieldKind::Enum { options } => {
                rule(rules::choice(value, label, options))
            }
            FieldKind::Color { options } => rule(rules::color(value, label, options)),
            FieldKind::Slug { .. } => rule(rules::slug(value, label)),
            FieldKind::Password => rule(rules::password(
                value,
                label,
                self.ctx.config().password_min_length,
            )),
            FieldKind::Tags { options } => self.check_tags(value, path, label, options),
            FieldKind::Asset { allowed_kinds } => self.check_asset(value, path, label, allowed_kinds)?,
            FieldKind::Assets { allowed_kinds } => self.check_assets(value, path, label, allowed_kinds)?,
            FieldKind::Relation { relation } => self.check_relation(value, path, label, relation)?,
            FieldKind::Repeater { fields } => self.check_repeater(value, path, label, fields)?,
            FieldKind::Layout { blocks } => self.check_layout(value, path, label, blocks)?,
        };

        Ok(checked)
    }
}

/// Null, and blank strings for fields whose empty value means "unchanged".
fn is_absent(field: &FieldDescriptor, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            s.is_empty() && matches!(field.kind, FieldKind::Password | FieldKind::Slug { .. })
        }
        Value::Object(map) => field.localized && map.is_empty(),
        _ => false,
    }
}

/// A password left blank on update keeps its stored hash.
fn keeps_stored(field: &FieldDescriptor, stored: Option<&Value>) -> bool {
    matches!(field.kind, FieldKind::Password) && stored.is_some_and(|v| !v.is_null())
}

pub(super) fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
