//! Locale selection on reads
//!
//! Collapses every localized field's `locale -> value` map to a single
//! value using a [`LocaleSelector`], at any nesting level.

use serde_json::{Map, Value};

use crate::providers::LocaleSelector;
use crate::schema::{FieldDescriptor, FieldKind};

pub fn select_locale(
    document: &Map<String, Value>,
    fields: &[FieldDescriptor],
    locale: &str,
    selector: &dyn LocaleSelector,
) -> Map<String, Value> {
    let mut out = document.clone();
    select_level(&mut out, fields, locale, selector);
    out
}

fn select_level(
    document: &mut Map<String, Value>,
    fields: &[FieldDescriptor],
    locale: &str,
    selector: &dyn LocaleSelector,
) {
    for field in fields {
        let Some(value) = document.get_mut(&field.handle) else {
            continue;
        };

        if field.localized {
            if value.is_object() {
                *value = selector.select(value, locale).unwrap_or(Value::Null);
            }
            continue;
        }

        match &field.kind {
            FieldKind::Repeater { fields: nested } => {
                for item in value.as_array_mut().into_iter().flatten() {
                    if let Value::Object(data) = item {
                        select_level(data, nested, locale, selector);
                    }
                }
            }
            FieldKind::Layout { blocks } => {
                for item in value.as_array_mut().into_iter().flatten() {
                    let block = item
                        .get("block_type")
                        .and_then(Value::as_str)
                        .and_then(|t| blocks.iter().find(|b| b.block_type == t));
                    if let (Some(block), Some(Value::Object(data))) = (block, item.get_mut("data")) {
                        select_level(data, &block.fields, locale, selector);
                    }
                }
            }
            _ => {}
        }
    }
}
