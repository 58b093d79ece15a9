//! Entry normalizer
//!
//! Post-validation transform applied before persistence. Fields are visited
//! in schema order and transformed by variant:
//!
//! - localized: bare values are wrapped as `{default_locale: value}` and
//!   merged over the previous locale map, so untouched locales survive; a
//!   localized field missing from the update keeps its stored map
//! - password: non-empty values are hashed; an absent or empty value keeps
//!   the previously stored hash
//! - slug: an empty slug is derived from its `source_field`; a supplied slug
//!   is never overwritten
//! - repeater / layout: nested fields get the same treatment, without a
//!   previous document (nested items have no stable identity)
//! - everything else passes through
//!
//! The previous document is a snapshot supplied by the caller, who is
//! responsible for serializing read-validate-normalize-write per entry.

use serde_json::{Map, Value};

use super::errors::{NormalizationError, NormalizationResult};
use super::slug::slugify;
use crate::errors::ContentResult;
use crate::observability::{Event, Logger};
use crate::schema::{Block, FieldDescriptor, FieldKind, Schema};
use crate::validation::{ValidatedDocument, ValidationContext};

/// Applies field-type side effects to validated entry data.
pub struct EntryNormalizer<'c, 'a> {
    ctx: &'c ValidationContext<'a>,
}

/// One level of a document being normalized.
struct Level<'d> {
    data: &'d Map<String, Value>,
    previous: Option<&'d Map<String, Value>>,
    path: String,
}

impl<'c, 'a> EntryNormalizer<'c, 'a> {
    pub fn new(ctx: &'c ValidationContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn normalize_schema(
        &self,
        schema: &Schema,
        validated: &ValidatedDocument,
        previous: Option<&Map<String, Value>>,
    ) -> ContentResult<Map<String, Value>> {
        self.normalize(&schema.fields, validated, previous)
    }

    /// Produces the document to persist.
    ///
    /// # Errors
    ///
    /// - `ContentError::Collaborator` if the default locale cannot be resolved
    /// - `ContentError::Normalization` if hashing fails
    pub fn normalize(
        &self,
        fields: &[FieldDescriptor],
        validated: &ValidatedDocument,
        previous: Option<&Map<String, Value>>,
    ) -> ContentResult<Map<String, Value>> {
        // Only consult the locale provider when a localized field exists.
        let locale = if any_localized(fields) {
            self.ctx.default_locale()?
        } else {
            self.ctx.config().fallback_locale.clone()
        };

        let level = Level {
            data: validated.as_map(),
            previous,
            path: String::new(),
        };
        let document = self.normalize_level(fields, &level, &locale)?;

        let count = document.len().to_string();
        Logger::info(
            Event::EntryNormalized.as_str(),
            &[("fields", &count), ("locale", &locale)],
        );
        Ok(document)
    }

    fn normalize_level(
        &self,
        fields: &[FieldDescriptor],
        level: &Level<'_>,
        locale: &str,
    ) -> NormalizationResult<Map<String, Value>> {
        let mut out = Map::new();

        for field in fields {
            let path = child_path(&level.path, &field.handle);
            let incoming = level.data.get(&field.handle);
            let prior = level.previous.and_then(|p| p.get(&field.handle));

            let value = match &field.kind {
                FieldKind::Password => self.password(incoming, prior, &path)?,
                FieldKind::Slug { source_field } => {
                    slug(field, incoming, source_field.as_deref(), level.data, locale)
                }
                FieldKind::Repeater { fields: nested } => {
                    self.repeater(nested, incoming, &path, locale)?
                }
                FieldKind::Layout { blocks } => self.layout(blocks, incoming, &path, locale)?,
                _ => incoming.cloned(),
            };

            let value = if field.localized {
                match value {
                    Some(v) => Some(localize(v, prior, locale)),
                    // Untouched localized fields keep every stored locale.
                    None => prior.filter(|p| p.is_object()).cloned(),
                }
            } else {
                value
            };

            if let Some(v) = value {
                out.insert(field.handle.clone(), v);
            }
        }

        Ok(out)
    }

    /// Hash new secrets; keep the stored hash when nothing new was supplied.
    fn password(&self, incoming: Option<&Value>, prior: Option<&Value>, path: &str) -> NormalizationResult<Option<Value>> {
        if let Some(Value::String(plain)) = incoming {
            if !plain.is_empty() {
                let hashed = self
                    .ctx
                    .hasher()
                    .hash(plain)
                    .map_err(|source| NormalizationError::Hash {
                        path: path.to_string(),
                        source,
                    })?;
                return Ok(Some(Value::String(hashed)));
            }
        }

        match prior {
            Some(stored) if !stored.is_null() => Ok(Some(stored.clone())),
            _ => Ok(incoming.map(|_| Value::Null)),
        }
    }

    fn repeater(
        &self,
        fields: &[FieldDescriptor],
        incoming: Option<&Value>,
        path: &str,
        locale: &str,
    ) -> NormalizationResult<Option<Value>> {
        let items = match incoming {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Ok(incoming.cloned()),
            Some(_) => {
                return Err(NormalizationError::UnexpectedShape {
                    path: path.to_string(),
                    expected: "array",
                })
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            let Value::Object(data) = item else {
                return Err(NormalizationError::UnexpectedShape {
                    path: item_path,
                    expected: "object",
                });
            };
            let level = Level {
                data,
                previous: None,
                path: item_path,
            };
            out.push(Value::Object(self.normalize_level(fields, &level, locale)?));
        }

        Ok(Some(Value::Array(out)))
    }

    fn layout(
        &self,
        blocks: &[Block],
        incoming: Option<&Value>,
        path: &str,
        locale: &str,
    ) -> NormalizationResult<Option<Value>> {
        let items = match incoming {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Ok(incoming.cloned()),
            Some(_) => {
                return Err(NormalizationError::UnexpectedShape {
                    path: path.to_string(),
                    expected: "array",
                })
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            let block = item
                .get("block_type")
                .and_then(Value::as_str)
                .and_then(|t| blocks.iter().find(|b| b.block_type == t));
            let data = item.get("data").and_then(Value::as_object);

            let (Some(block), Some(data)) = (block, data) else {
                return Err(NormalizationError::UnexpectedShape {
                    path: item_path,
                    expected: "declared block with object data",
                });
            };

            let level = Level {
                data,
                previous: None,
                path: format!("{}.data", item_path),
            };
            let normalized = self.normalize_level(&block.fields, &level, locale)?;

            let mut element = Map::new();
            element.insert("block_type".into(), Value::String(block.block_type.clone()));
            element.insert("data".into(), Value::Object(normalized));
            out.push(Value::Object(element));
        }

        Ok(Some(Value::Array(out)))
    }
}

/// Wraps a bare value under `locale` and merges it over the prior locale map.
fn localize(value: Value, prior: Option<&Value>, locale: &str) -> Value {
    let incoming = match value {
        Value::Null => return Value::Null,
        Value::Object(map) => map,
        bare => {
            let mut map = Map::new();
            map.insert(locale.to_string(), bare);
            map
        }
    };

    let mut merged = match prior {
        Some(Value::Object(old)) => old.clone(),
        _ => Map::new(),
    };
    for (loc, v) in incoming {
        merged.insert(loc, v);
    }
    Value::Object(merged)
}

/// Keeps a supplied slug; otherwise derives one from the source field.
fn slug(
    field: &FieldDescriptor,
    incoming: Option<&Value>,
    source_field: Option<&str>,
    data: &Map<String, Value>,
    locale: &str,
) -> Option<Value> {
    if incoming.is_some_and(|v| !is_blank(v)) {
        return incoming.cloned();
    }

    let derived = source_field
        .and_then(|handle| data.get(handle))
        .and_then(|source| derive_slug(source, field.localized, locale));

    derived.or_else(|| incoming.cloned())
}

fn derive_slug(source: &Value, localized: bool, locale: &str) -> Option<Value> {
    match source {
        Value::String(text) => non_empty_slug(text),
        // A localized slug follows every locale of a localized source.
        Value::Object(locales) if localized => {
            let derived: Map<String, Value> = locales
                .iter()
                .filter_map(|(loc, v)| v.as_str().and_then(non_empty_slug).map(|s| (loc.clone(), s)))
                .collect();
            (!derived.is_empty()).then_some(Value::Object(derived))
        }
        Value::Object(locales) => locales
            .get(locale)
            .and_then(Value::as_str)
            .or_else(|| locales.values().find_map(Value::as_str))
            .and_then(non_empty_slug),
        _ => None,
    }
}

fn non_empty_slug(text: &str) -> Option<Value> {
    let slug = slugify(text);
    (!slug.is_empty()).then_some(Value::String(slug))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn any_localized(fields: &[FieldDescriptor]) -> bool {
    fields.iter().any(|f| {
        f.localized
            || match &f.kind {
                FieldKind::Repeater { fields } => any_localized(fields),
                FieldKind::Layout { blocks } => blocks.iter().any(|b| any_localized(&b.fields)),
                _ => false,
            }
    })
}

fn child_path(prefix: &str, handle: &str) -> String {
    if prefix.is_empty() {
        handle.to_string()
    } else {
        format!("{}.{}", prefix, handle)
    }
}
