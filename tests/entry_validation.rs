//! Entry Validation Tests
//!
//! Validation invariants:
//! - Optional fields may be absent or null, for every variant
//! - Violations are reported by dotted path, all at once
//! - Any violation rejects the whole document
//! - Layout elements dispatch on `block_type`
//! - Reference fields are existence-checked within the space

use aerocms::providers::{
    CollaboratorError, CollaboratorResult, CollectionId, ExistenceProvider, HashProvider,
    ReferenceCatalog, ReferenceTarget, SpaceId,
};
use aerocms::schema::{Schema, SchemaCompiler, FIELD_TYPES};
use aerocms::validation::{EntryValidator, ValidationContext, ValidationErrors};
use aerocms::ContentError;
use serde_json::{json, Value};
use std::collections::HashSet;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestHash;

impl HashProvider for TestHash {
    fn hash(&self, plaintext: &str) -> CollaboratorResult<String> {
        Ok(format!("test-hash:{}", plaintext.len()))
    }
}

/// Existence provider that is always down.
struct Unreachable;

impl ExistenceProvider for Unreachable {
    fn resolve_collection(&self, _space: SpaceId, _handle: &str) -> CollaboratorResult<Option<CollectionId>> {
        Err(CollaboratorError::Existence("connection refused".into()))
    }

    fn existing(&self, _space: SpaceId, _target: ReferenceTarget<'_>, _ids: &[i64]) -> CollaboratorResult<HashSet<i64>> {
        Err(CollaboratorError::Existence("connection refused".into()))
    }
}

fn compile(raw: Value) -> Schema {
    SchemaCompiler::new().compile_schema(&raw).unwrap()
}

fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::new()
        .with_collection(SpaceId(1), "authors", CollectionId(10))
        .with_entries(CollectionId(10), &[1, 2, 3])
        .with_collection(SpaceId(2), "authors", CollectionId(20))
        .with_entries(CollectionId(20), &[99])
        .with_asset(SpaceId(1), 7, "image")
        .with_asset(SpaceId(1), 8, "document")
}

fn rejected(result: Result<impl std::fmt::Debug, ContentError>) -> ValidationErrors {
    match result {
        Err(ContentError::Validation(errors)) => errors,
        other => panic!("expected validation failure, got {:?}", other),
    }
}

fn blog() -> Schema {
    compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [
            {"handle": "title", "type": "text", "required": true},
            {"handle": "tags", "type": "tags", "required": false, "options": ["php", "laravel", "cms"]}
        ]
    }))
}

fn page() -> Schema {
    compile(json!({
        "handle": "pages",
        "type": "collection",
        "fields": [
            {"handle": "body", "type": "layout", "blocks": [
                {"type": "hero", "fields": [
                    {"handle": "heading", "type": "text", "required": true},
                    {"handle": "image", "type": "asset", "allowed_kinds": ["image"]}
                ]},
                {"type": "quote", "fields": [
                    {"handle": "text", "type": "textarea", "required": true},
                    {"handle": "rating", "type": "number"}
                ]}
            ]},
            {"handle": "faq", "type": "repeater", "fields": [
                {"handle": "question", "type": "text", "required": true},
                {"handle": "answer", "type": "richtext"}
            ]}
        ]
    }))
}

// =============================================================================
// Optional Field Tests
// =============================================================================

/// Every variant validates when optional and absent or null.
#[test]
fn test_optional_fields_absent_or_null() {
    let fields: Vec<Value> = FIELD_TYPES
        .iter()
        .map(|t| {
            let mut raw = json!({"handle": t, "type": t});
            match *t {
                "relation" => raw["relation"] = json!({"collection": "authors"}),
                "layout" => raw["blocks"] = json!([{"type": "hero", "fields": []}]),
                _ => {}
            }
            raw
        })
        .collect();
    let schema = compile(json!({"handle": "all", "type": "collection", "fields": fields}));

    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator.validate_schema(&schema, &json!({})).is_ok());

    let nulls: serde_json::Map<String, Value> =
        FIELD_TYPES.iter().map(|t| (t.to_string(), Value::Null)).collect();
    assert!(validator.validate_schema(&schema, &Value::Object(nulls)).is_ok());
}

/// Required fields must be present and non-null.
#[test]
fn test_required_fields() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    let errors = rejected(validator.validate_schema(&blog(), &json!({"title": null})));
    assert_eq!(errors.get("title").unwrap(), ["The Title field is required."]);

    let errors = rejected(validator.validate_schema(&blog(), &json!({})));
    assert!(errors.contains("title"));
}

// =============================================================================
// Option Set Tests
// =============================================================================

/// Tags outside the declared option set are reported per element.
#[test]
fn test_tags_option_set() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    let errors = rejected(validator.validate_schema(&blog(), &json!({"title": "Post", "tags": ["php", "go"]})));
    assert_eq!(errors.paths().collect::<Vec<_>>(), ["tags.1"]);
    assert!(errors.get("tags.1").unwrap()[0].contains("'go'"));

    let validated = validator
        .validate_schema(&blog(), &json!({"title": "Post", "tags": ["php"]}))
        .unwrap();
    assert_eq!(validated.get("tags"), Some(&json!(["php"])));
}

/// Empty option sets accept any string.
#[test]
fn test_open_option_sets() {
    let schema = compile(json!({
        "handle": "x",
        "type": "collection",
        "fields": [
            {"handle": "kind", "type": "select"},
            {"handle": "labels", "type": "tags"},
            {"handle": "level", "type": "enum", "options": ["low", "high"]}
        ]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator
        .validate_schema(&schema, &json!({"kind": "anything", "labels": ["x", "y"], "level": "low"}))
        .is_ok());
    let errors = rejected(validator.validate_schema(&schema, &json!({"level": "medium"})));
    assert!(errors.contains("level"));
}

// =============================================================================
// Scalar Rule Tests
// =============================================================================

/// All scalar violations are reported in one pass.
#[test]
fn test_scalar_rules_reported_together() {
    let schema = compile(json!({
        "handle": "event",
        "type": "collection",
        "fields": [
            {"handle": "name", "type": "text"},
            {"handle": "seats", "type": "number"},
            {"handle": "open", "type": "boolean"},
            {"handle": "day", "type": "date"},
            {"handle": "starts", "type": "time"},
            {"handle": "extra", "type": "json"},
            {"handle": "slug", "type": "slug"},
            {"handle": "pin", "type": "password"},
            {"handle": "tint", "type": "color"}
        ]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    let errors = rejected(validator.validate_schema(
        &schema,
        &json!({
            "name": 5,
            "seats": "many",
            "open": "yes",
            "day": "31/12/2024",
            "starts": "25:00",
            "extra": "text",
            "slug": "Not A Slug",
            "pin": "short",
            "tint": "blue"
        }),
    ));
    assert_eq!(errors.len(), 9);

    let valid = validator.validate_schema(
        &schema,
        &json!({
            "name": "Meetup",
            "seats": "40",
            "open": 1,
            "day": "2024-12-31",
            "starts": "18:30",
            "extra": {"k": "v"},
            "slug": "rust-meetup",
            "pin": "longenough",
            "tint": "#a0a0a0"
        }),
    );
    assert!(valid.is_ok());
}

/// Undeclared keys never reach the validated document.
#[test]
fn test_undeclared_keys_dropped() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);

    let validated = EntryValidator::new(&ctx)
        .validate_schema(&blog(), &json!({"title": "Post", "admin": true}))
        .unwrap();
    assert!(validated.get("admin").is_none());
    assert_eq!(validated.as_map().len(), 1);
}

/// A non-object document is rejected outright.
#[test]
fn test_document_must_be_object() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);

    let errors = rejected(EntryValidator::new(&ctx).validate_schema(&blog(), &json!(["title"])));
    assert!(errors.contains("data"));
}

// =============================================================================
// Localized Field Tests
// =============================================================================

/// Each locale entry is checked like a bare value.
#[test]
fn test_localized_values_checked_per_locale() {
    let schema = compile(json!({
        "handle": "x",
        "type": "collection",
        "fields": [{"handle": "count", "type": "number", "localized": true, "required": true}]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator.validate_schema(&schema, &json!({"count": 3})).is_ok());
    assert!(validator.validate_schema(&schema, &json!({"count": {"en": 1, "de": "2"}})).is_ok());

    let errors = rejected(validator.validate_schema(&schema, &json!({"count": {"en": 1, "de": "zwei"}})));
    assert_eq!(errors.paths().collect::<Vec<_>>(), ["count.de"]);

    let errors = rejected(validator.validate_schema(&schema, &json!({"count": {}})));
    assert!(errors.contains("count"));
}

// =============================================================================
// Layout Tests
// =============================================================================

/// Unknown block types fail at `field[i].block_type`; known blocks validate their data.
#[test]
fn test_layout_dispatch() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    let errors = rejected(validator.validate_schema(
        &page(),
        &json!({"body": [
            {"block_type": "hero", "data": {"heading": "Welcome"}},
            {"block_type": "video", "data": {"url": "x"}},
            {"block_type": "quote", "data": {"rating": 5}}
        ]}),
    ));

    assert_eq!(
        errors.paths().collect::<Vec<_>>(),
        ["body[1].block_type", "body[2].data.text"]
    );
}

/// Valid layouts keep only declared block fields.
#[test]
fn test_layout_valid() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);

    let validated = EntryValidator::new(&ctx)
        .validate_schema(
            &page(),
            &json!({"body": [
                {"block_type": "hero", "data": {"heading": "Hi", "image": 7, "stray": 1}},
                {"block_type": "quote", "data": {"text": "Ship it", "rating": "4.5"}}
            ]}),
        )
        .unwrap();

    assert_eq!(
        validated.get("body").unwrap()[0],
        json!({"block_type": "hero", "data": {"heading": "Hi", "image": 7}})
    );
}

/// Structural errors on elements are reported without dispatching.
#[test]
fn test_layout_structure() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    let errors = rejected(validator.validate_schema(
        &page(),
        &json!({"body": [
            "hero",
            {"block_type": "hero"},
            {"data": {}},
            {"block_type": "hero", "data": []}
        ]}),
    ));

    assert!(errors.contains("body[0]"));
    assert!(errors.contains("body[1].data"));
    assert!(errors.contains("body[2].block_type"));
    assert!(errors.contains("body[3].data"));
    assert!(!errors.contains("body[3].data.heading"));

    let errors = rejected(validator.validate_schema(&page(), &json!({"body": {"block_type": "hero"}})));
    assert!(errors.contains("body"));
}

// =============================================================================
// Repeater Tests
// =============================================================================

/// Repeater items are validated against the nested fields with indexed paths.
#[test]
fn test_repeater_paths() {
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);

    let errors = rejected(EntryValidator::new(&ctx).validate_schema(
        &page(),
        &json!({"faq": [
            {"question": "Why?", "answer": "Because."},
            {"answer": "No question"},
            {"question": 42}
        ]}),
    ));

    assert_eq!(
        errors.paths().collect::<Vec<_>>(),
        ["faq[1].question", "faq[2].question"]
    );
}

// =============================================================================
// Reference Tests
// =============================================================================

/// Single relation to a missing entry fails; existing passes.
#[test]
fn test_single_relation() {
    let schema = compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [{"handle": "author", "type": "relation", "relation": {"collection": "authors", "max": 1}}]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator.validate_schema(&schema, &json!({"author": 2})).is_ok());
    assert!(validator.validate_schema(&schema, &json!({"author": "3"})).is_ok());

    let errors = rejected(validator.validate_schema(&schema, &json!({"author": 404})));
    assert_eq!(errors.get("author").unwrap(), ["The selected Author is invalid."]);

    let errors = rejected(validator.validate_schema(&schema, &json!({"author": [1]})));
    assert!(errors.contains("author"));
}

/// Multi relation fails as a whole when any id is missing; one lookup per field.
#[test]
fn test_multi_relation() {
    let schema = compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [{"handle": "authors", "type": "relation", "relation": {"collection": "authors", "max": null}}]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator.validate_schema(&schema, &json!({"authors": [1, 2, 3]})).is_ok());
    let before = catalog.query_count();

    let errors = rejected(validator.validate_schema(&schema, &json!({"authors": [1, 404]})));
    assert_eq!(errors.paths().collect::<Vec<_>>(), ["authors"]);
    assert_eq!(catalog.query_count() - before, 1);
}

/// Existence checks never cross space boundaries.
#[test]
fn test_references_scoped_to_space() {
    let schema = compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [
            {"handle": "author", "type": "relation", "relation": {"collection": "authors", "max": 1}},
            {"handle": "cover", "type": "asset"}
        ]
    }));
    let catalog = catalog();

    let space_two = ValidationContext::new(SpaceId(2), &catalog, &TestHash);
    let errors = rejected(EntryValidator::new(&space_two).validate_schema(&schema, &json!({"author": 1, "cover": 7})));
    assert!(errors.contains("author"));
    assert!(errors.contains("cover"));

    assert!(EntryValidator::new(&space_two)
        .validate_schema(&schema, &json!({"author": 99}))
        .is_ok());
}

/// A relation to a collection missing from the space rejects any value.
#[test]
fn test_unresolvable_relation_fails_closed() {
    let schema = compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [{"handle": "editor", "type": "relation", "relation": {"collection": "editors"}}]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator.validate_schema(&schema, &json!({})).is_ok());
    let errors = rejected(validator.validate_schema(&schema, &json!({"editor": []})));
    assert!(errors.contains("editor"));
}

/// Asset kinds filter the existence check.
#[test]
fn test_asset_kinds() {
    let schema = compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [{"handle": "gallery", "type": "assets", "allowed_kinds": ["image"]}]
    }));
    let catalog = catalog();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &TestHash);
    let validator = EntryValidator::new(&ctx);

    assert!(validator.validate_schema(&schema, &json!({"gallery": [7]})).is_ok());
    let errors = rejected(validator.validate_schema(&schema, &json!({"gallery": [7, 8]})));
    assert!(errors.contains("gallery"));

    let errors = rejected(validator.validate_schema(&schema, &json!({"gallery": [7, "x"]})));
    assert!(errors.contains("gallery.1"));
}

/// Provider failures are fatal and never folded into the error map.
#[test]
fn test_collaborator_failure_is_fatal() {
    let schema = compile(json!({
        "handle": "posts",
        "type": "collection",
        "fields": [
            {"handle": "title", "type": "text", "required": true},
            {"handle": "author", "type": "relation", "relation": {"collection": "authors", "max": 1}}
        ]
    }));
    let provider = Unreachable;
    let ctx = ValidationContext::new(SpaceId(1), &provider, &TestHash);

    let err = EntryValidator::new(&ctx)
        .validate_schema(&schema, &json!({"author": 1}))
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(err.validation_errors().is_none());
    assert_eq!(err.code(), "CMS_COLLABORATOR_EXISTENCE");
}
