//! Schema compiler
//!
//! Turns raw, administrator-authored schema documents into canonical
//! [`FieldDescriptor`] trees. Compilation rules:
//!
//! - A field's identity is `handle`, falling back to `id` then `name`
//! - `label` defaults to the humanized handle
//! - `type` must be one of [`FIELD_TYPES`]
//! - `localized` is only legal on [`LOCALIZABLE_TYPES`]
//! - `relation.max` is `1` or nothing
//! - Handles are unique per nesting level, block types unique per layout
//! - Repeater/layout nesting is bounded by `max_depth`

use serde_json::{Map, Value};
use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    humanize, Block, FieldDescriptor, FieldKind, OptionSet, RelationSpec, Schema, FIELD_TYPES,
    LOCALIZABLE_TYPES, SCHEMA_KINDS,
};
use crate::config::EngineConfig;
use crate::observability::{Event, Logger};

/// Default bound on repeater/layout nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Validates and canonicalizes schema definitions.
///
/// Stateless apart from its nesting limit; one instance may be shared.
#[derive(Debug, Clone)]
pub struct SchemaCompiler {
    max_depth: usize,
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl SchemaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_depth: config.max_nesting_depth,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Compiles a complete schema document `{handle, type, fields, settings}`.
    pub fn compile_schema(&self, payload: &Value) -> SchemaResult<Schema> {
        let result = self.compile_schema_inner(payload);
        match &result {
            Ok(schema) => {
                let count = schema.fields.len().to_string();
                Logger::info(
                    Event::SchemaCompiled.as_str(),
                    &[("schema", &schema.handle), ("fields", &count)],
                );
            }
            Err(err) => {
                let message = err.to_string();
                Logger::warn(
                    Event::SchemaRejected.as_str(),
                    &[("code", err.code()), ("reason", &message)],
                );
            }
        }
        result
    }

    fn compile_schema_inner(&self, payload: &Value) -> SchemaResult<Schema> {
        let obj = payload
            .as_object()
            .ok_or_else(|| SchemaError::InvalidDocument("must be an object".into()))?;

        let handle = non_empty_str(obj.get("handle"))
            .ok_or_else(|| SchemaError::InvalidDocument("handle is required".into()))?;

        let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();
        if !SCHEMA_KINDS.contains(&kind) {
            return Err(SchemaError::InvalidDocument(format!(
                "type must be one of: {}",
                SCHEMA_KINDS.join(", ")
            )));
        }

        let fields = match obj.get("fields") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => self.compile_fields(items, "fields", 1)?,
            Some(_) => {
                return Err(SchemaError::InvalidDocument("fields must be a list".into()));
            }
        };

        let settings = match obj.get("settings") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(SchemaError::InvalidDocument("settings must be a map".into()));
            }
        };

        Ok(Schema {
            handle: handle.to_string(),
            kind: kind.to_string(),
            fields,
            settings,
        })
    }

    /// Compiles a single field definition.
    pub fn compile_field(&self, input: &Value) -> SchemaResult<FieldDescriptor> {
        self.compile_field_at(input, "field", 1)
    }

    /// Compiles a sibling list, enforcing handle uniqueness.
    pub(crate) fn compile_fields(
        &self,
        items: &[Value],
        path: &str,
        depth: usize,
    ) -> SchemaResult<Vec<FieldDescriptor>> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            let field = self.compile_field_at(item, &item_path, depth)?;
            if !seen.insert(field.handle.clone()) {
                return Err(SchemaError::duplicate_handle(item_path, field.handle));
            }
            fields.push(field);
        }

        Ok(fields)
    }

    fn compile_field_at(&self, input: &Value, path: &str, depth: usize) -> SchemaResult<FieldDescriptor> {
        if depth > self.max_depth {
            return Err(SchemaError::TooDeep {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }

        let obj = input
            .as_object()
            .ok_or_else(|| SchemaError::invalid_field(path, "field definition must be an object"))?;

        let handle = ["handle", "id", "name"]
            .iter()
            .find_map(|key| non_empty_str(obj.get(*key)))
            .ok_or_else(|| SchemaError::invalid_field(path, "handle is required"))?
            .to_string();

        let label = non_empty_str(obj.get("label"))
            .map(str::to_string)
            .unwrap_or_else(|| humanize(&handle));

        let type_name = obj.get("type").and_then(Value::as_str).unwrap_or_default();
        if !FIELD_TYPES.contains(&type_name) {
            return Err(SchemaError::invalid_field(
                path,
                format!(
                    "type '{}' is not supported; allowed: {}",
                    type_name,
                    FIELD_TYPES.join(", ")
                ),
            ));
        }

        let required = flag(obj.get("required"));
        let localized = flag(obj.get("localized"));
        if localized && !LOCALIZABLE_TYPES.contains(&type_name) {
            return Err(SchemaError::invalid_field(
                path,
                format!("type '{}' cannot be localized", type_name),
            ));
        }

        let kind = self.compile_kind(type_name, obj, path, depth)?;

        Ok(FieldDescriptor {
            handle,
            label,
            kind,
            required,
            localized,
        })
    }

    fn compile_kind(
        &self,
        type_name: &str,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> SchemaResult<FieldKind> {
        let kind = match type_name {
            "text" => FieldKind::Text,
            "textarea" => FieldKind::Textarea,
            "richtext" => FieldKind::Richtext,
            "number" => FieldKind::Number,
            "boolean" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "datetime" => FieldKind::Datetime,
            "time" => FieldKind::Time,
            "json" => FieldKind::Json,
            "password" => FieldKind::Password,
            "slug" => FieldKind::Slug {
                source_field: non_empty_str(obj.get("source_field")).map(str::to_string),
            },
            "select" => FieldKind::Select {
                options: option_set(obj, path)?,
            },
            "radio" => FieldKind::Radio {
                options: option_set(obj, path)?,
            },
            "enum" => FieldKind::Enum {
                options: option_set(obj, path)?,
            },
            "color" => FieldKind::Color {
                options: option_set(obj, path)?,
            },
            "tags" => FieldKind::Tags {
                options: option_set(obj, path)?,
            },
            "asset" => FieldKind::Asset {
                allowed_kinds: string_list(obj.get("allowed_kinds"), path, "allowed_kinds")?,
            },
            "assets" => FieldKind::Assets {
                allowed_kinds: string_list(obj.get("allowed_kinds"), path, "allowed_kinds")?,
            },
            "relation" => FieldKind::Relation {
                relation: relation_spec(obj, path)?,
            },
            "repeater" => {
                let items = match obj.get("fields") {
                    None | Some(Value::Null) => &[][..],
                    Some(Value::Array(items)) => items.as_slice(),
                    Some(_) => {
                        return Err(SchemaError::invalid_field(path, "repeater fields must be a list"));
                    }
                };
                FieldKind::Repeater {
                    fields: self.compile_fields(items, &format!("{}.fields", path), depth + 1)?,
                }
            }
            "layout" => FieldKind::Layout {
                blocks: self.compile_blocks(obj.get("blocks"), path, depth)?,
            },
            other => {
                return Err(SchemaError::invalid_field(
                    path,
                    format!("type '{}' is not supported", other),
                ));
            }
        };

        Ok(kind)
    }

    fn compile_blocks(&self, raw: Option<&Value>, path: &str, depth: usize) -> SchemaResult<Vec<Block>> {
        let items = match raw {
            Some(Value::Array(items)) if !items.is_empty() => items,
            Some(Value::Array(_)) | None | Some(Value::Null) => {
                return Err(SchemaError::invalid_field(path, "layout requires at least one block"));
            }
            Some(_) => {
                return Err(SchemaError::invalid_field(path, "layout blocks must be a list"));
            }
        };

        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            let block_path = format!("{}.blocks[{}]", path, i);
            let block = self.compile_block(item, &block_path, depth)?;
            if !seen.insert(block.block_type.clone()) {
                return Err(SchemaError::duplicate_block(block_path, block.block_type));
            }
            blocks.push(block);
        }

        Ok(blocks)
    }

    fn compile_block(&self, raw: &Value, path: &str, depth: usize) -> SchemaResult<Block> {
        let obj = raw
            .as_object()
            .ok_or_else(|| SchemaError::invalid_block(path, "block definition must be an object"))?;

        let block_type = ["type", "handle"]
            .iter()
            .find_map(|key| non_empty_str(obj.get(*key)))
            .ok_or_else(|| SchemaError::invalid_block(path, "block type is required"))?
            .to_string();

        let label = non_empty_str(obj.get("label"))
            .map(str::to_string)
            .unwrap_or_else(|| humanize(&block_type));

        let fields = match obj.get("fields") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => {
                self.compile_fields(items, &format!("{}.fields", path), depth + 1)?
            }
            Some(_) => return Err(SchemaError::invalid_block(path, "block fields must be a list")),
        };

        Ok(Block {
            block_type,
            label,
            fields,
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Reads a boolean flag; `1`/`"1"`/`"true"` count as set.
fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    }
}

/// Accepts `options: {values: [...]}` or a bare `options: [...]`.
fn option_set(obj: &Map<String, Value>, path: &str) -> SchemaResult<OptionSet> {
    let raw = match obj.get("options") {
        Some(Value::Object(options)) => options.get("values"),
        other => other,
    };
    Ok(OptionSet::new(string_list(raw, path, "options.values")?))
}

fn string_list(value: Option<&Value>, path: &str, key: &str) -> SchemaResult<Vec<String>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SchemaError::invalid_field(path, format!("{} must be a list", key)));
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(SchemaError::invalid_field(
                path,
                format!("{} must contain only strings", key),
            )),
        })
        .collect()
}

fn relation_spec(obj: &Map<String, Value>, path: &str) -> SchemaResult<RelationSpec> {
    let relation = obj.get("relation").and_then(Value::as_object);

    let collection = relation
        .and_then(|r| non_empty_str(r.get("collection")))
        .ok_or_else(|| SchemaError::invalid_field(path, "relation.collection is required"))?;

    // Only the integer 1 means "single"; anything else is unbounded.
    let single = relation
        .and_then(|r| r.get("max"))
        .and_then(Value::as_i64)
        == Some(1);

    Ok(RelationSpec::new(collection, single.then_some(1)))
}
