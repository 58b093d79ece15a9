//! Field lifecycle on a compiled schema
//!
//! Fields are added, merge-patched or deleted one at a time after the schema
//! exists. Deleting a field never touches stored entries; their orphaned keys
//! disappear on the next full overwrite.

use serde_json::{Map, Value};

use super::compiler::SchemaCompiler;
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, Schema};
use crate::observability::{Event, Logger};

impl Schema {
    /// Compiles `raw` and appends it as a new top-level field.
    pub fn add_field(&mut self, compiler: &SchemaCompiler, raw: &Value) -> SchemaResult<&FieldDescriptor> {
        let path = format!("fields[{}]", self.fields.len());
        let field = compiler.compile_field(raw).map_err(|e| rebase(e, &path))?;

        if self.field(&field.handle).is_some() {
            return Err(SchemaError::duplicate_handle(path, field.handle));
        }

        Logger::info(
            Event::FieldAdded.as_str(),
            &[("schema", &self.handle), ("field", &field.handle)],
        );
        let index = self.fields.len();
        self.fields.push(field);
        Ok(&self.fields[index])
    }

    /// Applies a JSON merge-patch to the field named `handle` and recompiles it.
    ///
    /// The patched handle must stay unique among the other siblings.
    pub fn update_field(
        &mut self,
        compiler: &SchemaCompiler,
        handle: &str,
        patch: &Value,
    ) -> SchemaResult<&FieldDescriptor> {
        let index = self
            .fields
            .iter()
            .position(|f| f.handle == handle)
            .ok_or_else(|| SchemaError::UnknownField(handle.to_string()))?;

        let path = format!("fields[{}]", index);
        let mut raw = self.fields[index].to_value();
        merge_patch(&mut raw, patch);

        let field = compiler.compile_field(&raw).map_err(|e| rebase(e, &path))?;

        let clashes = self
            .fields
            .iter()
            .enumerate()
            .any(|(i, f)| i != index && f.handle == field.handle);
        if clashes {
            return Err(SchemaError::duplicate_handle(path, field.handle));
        }

        Logger::info(
            Event::FieldUpdated.as_str(),
            &[("schema", &self.handle), ("field", &field.handle)],
        );
        self.fields[index] = field;
        Ok(&self.fields[index])
    }

    /// Removes the field named `handle`, returning its last definition.
    pub fn delete_field(&mut self, handle: &str) -> SchemaResult<FieldDescriptor> {
        let index = self
            .fields
            .iter()
            .position(|f| f.handle == handle)
            .ok_or_else(|| SchemaError::UnknownField(handle.to_string()))?;

        Logger::info(
            Event::FieldDeleted.as_str(),
            &[("schema", &self.handle), ("field", handle)],
        );
        Ok(self.fields.remove(index))
    }
}

/// RFC 7396 JSON merge-patch.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.shift_remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

/// Re-roots errors from a standalone field compile onto its schema position.
fn rebase(err: SchemaError, path: &str) -> SchemaError {
    let rewrite = |p: String| match p.strip_prefix("field") {
        Some(rest) => format!("{}{}", path, rest),
        None => p,
    };

    match err {
        SchemaError::InvalidField { path, message } => SchemaError::InvalidField {
            path: rewrite(path),
            message,
        },
        SchemaError::InvalidBlock { path, message } => SchemaError::InvalidBlock {
            path: rewrite(path),
            message,
        },
        SchemaError::Duplicate { path, what, name } => SchemaError::Duplicate {
            path: rewrite(path),
            what,
            name,
        },
        SchemaError::TooDeep { path, limit } => SchemaError::TooDeep {
            path: rewrite(path),
            limit,
        },
        other => other,
    }
}
