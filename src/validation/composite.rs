//! List-valued and nested fields: tags, repeater, layout
//!
//! Layout validation runs in two passes. The structural pass is derived from
//! the schema alone: every element must be `{block_type, data}` with a
//! declared block type and a map for `data`. The dispatch pass then looks up
//! the block matching each element's discriminant and validates `data`
//! against that block's fields. Elements that failed the structural pass are
//! not dispatched.

use serde_json::{json, Map, Value};
use std::collections::HashMap;

use super::errors::ValidationErrors;
use super::validator::{join_path, Checked, EntryValidator};
use crate::providers::CollaboratorResult;
use crate::schema::{Block, FieldDescriptor, OptionSet};

/// Lookup table from discriminant to block.
struct BlockIndex<'s> {
    blocks: HashMap<&'s str, &'s Block>,
}

impl<'s> BlockIndex<'s> {
    fn new(blocks: &'s [Block]) -> Self {
        Self {
            blocks: blocks.iter().map(|b| (b.block_type.as_str(), b)).collect(),
        }
    }

    fn get(&self, block_type: &str) -> Option<&'s Block> {
        self.blocks.get(block_type).copied()
    }
}

impl<'c, 'a> EntryValidator<'c, 'a> {
    pub(super) fn check_tags(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        options: &OptionSet,
    ) -> Checked<Option<Value>> {
        let Some(items) = value.as_array() else {
            return Checked::fail(path, format!("The {} field must be an array.", label));
        };

        let mut errors = ValidationErrors::new();
        for (i, item) in items.iter().enumerate() {
            let item_path = join_path(path, &i.to_string());
            match item.as_str() {
                None => errors.add(item_path, format!("The {}.{} field must be a string.", label, i)),
                Some(tag) if !options.allows(tag) => errors.add(
                    item_path,
                    format!("The value '{}' is not an allowed option for {}.", tag, label),
                ),
                Some(_) => {}
            }
        }

        Checked::with_errors(value.clone(), errors)
    }

    pub(super) fn check_repeater(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        fields: &[FieldDescriptor],
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let Some(items) = value.as_array() else {
            return Ok(Checked::fail(path, format!("The {} field must be an array.", label)));
        };

        let mut accepted = Vec::with_capacity(items.len());
        let mut errors = ValidationErrors::new();

        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            let Some(doc) = item.as_object() else {
                errors.add(&item_path, format!("Each {} item must be an object.", label));
                accepted.push(item.clone());
                continue;
            };

            let checked = self.check_fields(fields, doc, &item_path)?;
            accepted.push(Value::Object(checked.value));
            errors.merge(checked.errors);
        }

        Ok(Checked::with_errors(Value::Array(accepted), errors))
    }

    pub(super) fn check_layout(
        &self,
        value: &Value,
        path: &str,
        label: &str,
        blocks: &[Block],
    ) -> CollaboratorResult<Checked<Option<Value>>> {
        let Some(items) = value.as_array() else {
            return Ok(Checked::fail(path, format!("The {} field must be an array.", label)));
        };

        let index = BlockIndex::new(blocks);
        let (matched, mut errors) = structural_pass(items, path, &index);

        let mut accepted = Vec::with_capacity(items.len());
        for (i, (item, hit)) in items.iter().zip(matched).enumerate() {
            let Some((block, data)) = hit else {
                accepted.push(item.clone());
                continue;
            };

            let checked = self.check_fields(&block.fields, data, &format!("{}[{}].data", path, i))?;
            errors.merge(checked.errors);
            accepted.push(json!({
                "block_type": block.block_type,
                "data": Value::Object(checked.value),
            }));
        }

        Ok(Checked::with_errors(Value::Array(accepted), errors))
    }
}

/// Checks element shape and discriminant for every layout element.
///
/// Returns, per element, the matched block and its data when both are usable.
fn structural_pass<'v, 's>(
    items: &'v [Value],
    path: &str,
    index: &BlockIndex<'s>,
) -> (Vec<Option<(&'s Block, &'v Map<String, Value>)>>, ValidationErrors) {
    let mut matched = Vec::with_capacity(items.len());
    let mut errors = ValidationErrors::new();

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", path, i);
        let Some(element) = item.as_object() else {
            errors.add(&item_path, "Each block must be an object with block_type and data.");
            matched.push(None);
            continue;
        };

        let block = match element.get("block_type").and_then(Value::as_str) {
            Some(block_type) => {
                let block = index.get(block_type);
                if block.is_none() {
                    errors.add(
                        format!("{}.block_type", item_path),
                        format!("The selected block type '{}' is invalid.", block_type),
                    );
                }
                block
            }
            None => {
                errors.add(format!("{}.block_type", item_path), "The block type field is required.");
                None
            }
        };

        let data = element.get("data").and_then(Value::as_object);
        if data.is_none() {
            errors.add(format!("{}.data", item_path), "The block data must be an object.");
        }

        matched.push(block.zip(data));
    }

    (matched, errors)
}
