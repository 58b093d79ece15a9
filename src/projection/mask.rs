//! Secret masking
//!
//! Stored password hashes never leave the engine: every password field
//! present in a document reads back as `null`, at any nesting level.

use serde_json::{Map, Value};

use crate::schema::{Block, FieldDescriptor, FieldKind};

/// Replaces every present password field with `null`.
pub fn mask(document: &Map<String, Value>, fields: &[FieldDescriptor]) -> Map<String, Value> {
    let mut out = document.clone();
    mask_level(&mut out, fields);
    out
}

fn mask_level(document: &mut Map<String, Value>, fields: &[FieldDescriptor]) {
    for field in fields {
        let Some(value) = document.get_mut(&field.handle) else {
            continue;
        };

        match &field.kind {
            FieldKind::Password => *value = Value::Null,
            FieldKind::Repeater { fields: nested } => {
                for item in items_mut(value) {
                    if let Value::Object(data) = item {
                        mask_level(data, nested);
                    }
                }
            }
            FieldKind::Layout { blocks } => {
                for item in items_mut(value) {
                    mask_block(item, blocks);
                }
            }
            _ => {}
        }
    }
}

fn mask_block(item: &mut Value, blocks: &[Block]) {
    let Some(block) = item
        .get("block_type")
        .and_then(Value::as_str)
        .and_then(|t| blocks.iter().find(|b| b.block_type == t))
    else {
        return;
    };

    if let Some(Value::Object(data)) = item.get_mut("data") {
        mask_level(data, &block.fields);
    }
}

fn items_mut(value: &mut Value) -> impl Iterator<Item = &mut Value> {
    value.as_array_mut().into_iter().flatten()
}
