//! Entry Normalization Tests
//!
//! Write-side side effects, run on validated data:
//! - Localized values merge per locale across updates
//! - Password hashes are sticky unless a new value is supplied
//! - Slugs derive from their source field and never overwrite user input
//! - Fields are emitted in schema order

use aerocms::normalize::EntryNormalizer;
use aerocms::providers::{
    Argon2Hasher, CollaboratorResult, FixedLocale, HashProvider, ReferenceCatalog, SpaceId,
};
use aerocms::schema::{Schema, SchemaCompiler};
use aerocms::validation::{EntryValidator, ValidationContext};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Helper Functions
// =============================================================================

/// Deterministic hasher that salts with a call counter, like a real one.
#[derive(Default)]
struct CountingHash {
    calls: AtomicUsize,
}

impl HashProvider for CountingHash {
    fn hash(&self, plaintext: &str) -> CollaboratorResult<String> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(format!("$test${}${}", n, plaintext.len()))
    }
}

fn schema() -> Schema {
    SchemaCompiler::new()
        .compile_schema(&json!({
            "handle": "articles",
            "type": "collection",
            "fields": [
                {"handle": "title", "type": "text", "required": true, "localized": true},
                {"handle": "slug", "type": "slug", "source_field": "title"},
                {"handle": "secret", "type": "password"},
                {"handle": "views", "type": "number"}
            ]
        }))
        .unwrap()
}

/// Validate then normalize, the way the write path does.
fn write(ctx: &ValidationContext<'_>, schema: &Schema, data: Value, previous: Option<&Map<String, Value>>) -> Map<String, Value> {
    let validated = EntryValidator::new(ctx).validate_schema(schema, &data).unwrap();
    EntryNormalizer::new(ctx)
        .normalize_schema(schema, &validated, previous)
        .unwrap()
}

// =============================================================================
// Locale Merge Tests
// =============================================================================

/// Create with `{en: a}`, update with `{de: b}` → `{en: a, de: b}`.
#[test]
fn test_localized_merge_across_updates() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);
    let schema = schema();

    let created = write(&ctx, &schema, json!({"title": {"en": "a"}}), None);
    assert_eq!(created["title"], json!({"en": "a"}));

    let updated = write(&ctx, &schema, json!({"title": {"de": "b"}}), Some(&created));
    assert_eq!(updated["title"], json!({"en": "a", "de": "b"}));

    // A bare value replaces only the default locale.
    let bare = write(&ctx, &schema, json!({"title": "c"}), Some(&updated));
    assert_eq!(bare["title"], json!({"en": "c", "de": "b"}));
}

/// Updating one localized field leaves every locale of the others in place.
#[test]
fn test_untouched_localized_field_keeps_locales() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);
    let schema = SchemaCompiler::new()
        .compile_schema(&json!({
            "handle": "pages",
            "type": "collection",
            "fields": [
                {"handle": "title", "type": "text", "localized": true},
                {"handle": "body", "type": "richtext", "localized": true}
            ]
        }))
        .unwrap();
    let stored = json!({"title": {"en": "a", "de": "b"}, "body": {"en": "x", "de": "y"}});

    let updated = write(&ctx, &schema, json!({"title": {"fr": "c"}}), stored.as_object());

    assert_eq!(updated["title"], json!({"en": "a", "de": "b", "fr": "c"}));
    assert_eq!(updated["body"], json!({"en": "x", "de": "y"}));
}

/// Bare values are wrapped under the space's default locale.
#[test]
fn test_default_locale_from_provider() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let locales = FixedLocale::new("nl");
    let ctx = ValidationContext::new(SpaceId(3), &catalog, &hasher).with_locale_provider(&locales);

    let created = write(&ctx, &schema(), json!({"title": "Hallo"}), None);
    assert_eq!(created["title"], json!({"nl": "Hallo"}));
}

// =============================================================================
// Password Tests
// =============================================================================

/// Hash on create, keep on omit, change on new value.
#[test]
fn test_password_lifecycle() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);
    let schema = schema();

    let created = write(&ctx, &schema, json!({"title": "t", "secret": "secret123"}), None);
    let first_hash = created["secret"].clone();
    assert_ne!(first_hash, json!("secret123"));
    assert!(first_hash.is_string());

    let omitted = write(&ctx, &schema, json!({"title": "t"}), Some(&created));
    assert_eq!(omitted["secret"], first_hash);

    let blank = write(&ctx, &schema, json!({"title": "t", "secret": ""}), Some(&created));
    assert_eq!(blank["secret"], first_hash);

    let changed = write(&ctx, &schema, json!({"title": "t", "secret": "another-secret"}), Some(&created));
    assert_ne!(changed["secret"], first_hash);
}

/// The Argon2 provider produces verifiable PHC strings.
#[test]
fn test_argon2_hash_verifies() {
    let catalog = ReferenceCatalog::new();
    let hasher = Argon2Hasher::with_params(8, 1, 1).unwrap();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);

    let stored = write(&ctx, &schema(), json!({"title": "t", "secret": "secret123"}), None);
    let hash = stored["secret"].as_str().unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(hasher.verify("secret123", hash));
    assert!(!hasher.verify("secret124", hash));
}

// =============================================================================
// Slug Tests
// =============================================================================

/// `Hello World!` → `hello-world` when the slug is absent.
#[test]
fn test_slug_derived_from_source() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);

    let stored = write(&ctx, &schema(), json!({"title": "Hello World!"}), None);
    assert_eq!(stored["slug"], json!("hello-world"));
}

/// A supplied slug is kept as-is.
#[test]
fn test_slug_never_overwritten() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);

    let stored = write(&ctx, &schema(), json!({"title": "Hello World!", "slug": "greeting"}), None);
    assert_eq!(stored["slug"], json!("greeting"));
}

// =============================================================================
// Ordering Tests
// =============================================================================

/// Output follows schema order, not input key order.
#[test]
fn test_schema_order() {
    let catalog = ReferenceCatalog::new();
    let hasher = CountingHash::default();
    let ctx = ValidationContext::new(SpaceId(1), &catalog, &hasher);

    let stored = write(&ctx, &schema(), json!({"views": 3, "secret": "longsecret", "title": "x"}), None);
    let keys: Vec<&str> = stored.keys().map(String::as_str).collect();
    assert_eq!(keys, ["title", "slug", "secret", "views"]);
}
