//! Read shaping
//!
//! Applies the read options to a stored entry in a fixed order:
//! mask → locale → depth → projection. Masking always runs; the other steps
//! run only when requested.

use std::collections::HashMap;

use serde_json::Value;

use super::depth::{clamp_depth, limit_depth};
use super::errors::{ProjectionError, ProjectionResult};
use super::fields::project;
use super::locale::select_locale;
use super::mask::mask;
use crate::config::EngineConfig;
use crate::entry::EntryRecord;
use crate::observability::{Event, Logger};
use crate::providers::LocaleSelector;
use crate::schema::Schema;

/// Parsed read query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Comma-separated output keys (`fields=`)
    pub fields: Option<String>,
    /// Pruning depth (`max_depth=`), already clamped
    pub max_depth: Option<usize>,
    /// Requested locale (`locale=`)
    pub locale: Option<String>,
}

impl ReadOptions {
    /// Parses read options from query parameters.
    ///
    /// `populate=` belongs to the reference expander and is ignored here, as
    /// are unknown parameters.
    pub fn parse(params: &HashMap<String, String>) -> ProjectionResult<Self> {
        let mut options = ReadOptions::default();

        for (key, value) in params {
            match key.as_str() {
                "fields" => options.fields = non_blank(value),
                "locale" => options.locale = non_blank(value),
                "max_depth" => options.max_depth = Some(parse_depth(value)?),
                _ => {}
            }
        }

        Ok(options)
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_max_depth(mut self, depth: i64) -> Self {
        self.max_depth = Some(clamp_depth(depth));
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_depth(value: &str) -> ProjectionResult<usize> {
    value
        .trim()
        .parse::<i64>()
        .map(clamp_depth)
        .map_err(|_| ProjectionError::InvalidOption {
            name: "max_depth",
            value: value.to_string(),
        })
}

/// Shapes stored entries for output.
pub struct ReadProjector<'s> {
    selector: &'s dyn LocaleSelector,
    depth_cap: usize,
}

impl<'s> ReadProjector<'s> {
    pub fn new(selector: &'s dyn LocaleSelector) -> Self {
        Self {
            selector,
            depth_cap: crate::config::MAX_READ_DEPTH,
        }
    }

    pub fn from_config(config: &EngineConfig, selector: &'s dyn LocaleSelector) -> Self {
        Self {
            selector,
            depth_cap: config.max_read_depth.min(crate::config::MAX_READ_DEPTH),
        }
    }

    /// Produces the read payload for `entry`.
    ///
    /// Without `fields` the result is `{id, status, published_at, data}`;
    /// with `fields` it is the flat projection of the shaped entry.
    pub fn shape(&self, entry: &EntryRecord, schema: &Schema, options: &ReadOptions) -> Value {
        let mut data = mask(&entry.data, &schema.fields);

        if let Some(locale) = &options.locale {
            data = select_locale(&data, &schema.fields, locale, self.selector);
        }

        if let Some(depth) = options.max_depth {
            let depth = depth.min(self.depth_cap) as i64;
            if let Value::Object(pruned) = limit_depth(&Value::Object(data.clone()), depth) {
                data = pruned;
            }
        }

        let shaped = match &options.fields {
            Some(csv) => {
                let mut record = entry.clone();
                record.data = data;
                Value::Object(project(&record, csv))
            }
            None => entry.to_value_with(Value::Object(data)),
        };

        let id = entry.id.to_string();
        Logger::info(
            Event::EntryShaped.as_str(),
            &[
                ("entry", &id),
                ("fields", options.fields.as_deref().unwrap_or("*")),
                ("locale", options.locale.as_deref().unwrap_or("")),
                ("schema", &schema.handle),
            ],
        );
        shaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FallbackLocaleSelector;
    use crate::schema::SchemaCompiler;
    use serde_json::json;

    fn schema() -> Schema {
        SchemaCompiler::new()
            .compile_schema(&json!({
                "handle": "posts",
                "type": "collection",
                "fields": [
                    {"handle": "title", "type": "text", "localized": true},
                    {"handle": "secret", "type": "password"},
                    {"handle": "meta", "type": "json"}
                ]
            }))
            .unwrap()
    }

    fn entry() -> EntryRecord {
        let data = json!({
            "title": {"en": "Hello", "de": "Hallo"},
            "secret": "$argon2id$hash",
            "meta": {"a": {"b": 1}}
        });
        EntryRecord::new(9, data.as_object().unwrap().clone())
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = ReadOptions::parse(&params(&[
            ("fields", "id,title"),
            ("max_depth", "12"),
            ("locale", "de"),
            ("populate", "author"),
        ]))
        .unwrap();

        assert_eq!(options.fields.as_deref(), Some("id,title"));
        assert_eq!(options.max_depth, Some(8));
        assert_eq!(options.locale.as_deref(), Some("de"));
    }

    #[test]
    fn test_parse_rejects_bad_depth() {
        let err = ReadOptions::parse(&params(&[("max_depth", "deep")])).unwrap_err();
        assert_eq!(err.code(), "CMS_READ_INVALID_OPTION");
    }

    #[test]
    fn test_shape_full_payload_masks() {
        let selector = FallbackLocaleSelector::new("en");
        let shaped = ReadProjector::new(&selector).shape(&entry(), &schema(), &ReadOptions::default());

        assert_eq!(shaped["id"], json!(9));
        assert_eq!(shaped["status"], json!("draft"));
        assert_eq!(shaped["data"]["secret"], Value::Null);
        assert_eq!(shaped["data"]["title"], json!({"en": "Hello", "de": "Hallo"}));
    }

    #[test]
    fn test_shape_all_options() {
        let selector = FallbackLocaleSelector::new("en");
        let options = ReadOptions::default()
            .with_fields("id,title,secret,meta")
            .with_max_depth(0)
            .with_locale("de");

        let shaped = ReadProjector::new(&selector).shape(&entry(), &schema(), &options);
        assert_eq!(
            shaped,
            json!({"id": 9, "title": "Hallo", "secret": null, "meta": {}})
        );
    }

    #[test]
    fn test_config_caps_depth() {
        let selector = FallbackLocaleSelector::new("en");
        let config = EngineConfig {
            max_read_depth: 1,
            ..EngineConfig::default()
        };
        let options = ReadOptions::default().with_max_depth(5);

        let shaped = ReadProjector::from_config(&config, &selector).shape(&entry(), &schema(), &options);
        assert_eq!(shaped["data"]["meta"], json!({"a": {}}));
    }
}
