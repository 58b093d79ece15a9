//! Locale collaborators
//!
//! Localized fields store a map `locale -> value`. The write side needs the
//! space's default locale to wrap bare values; the read side picks one entry
//! out of the map.

use serde_json::Value;

use super::errors::CollaboratorResult;
use super::existence::SpaceId;

/// Supplies the default locale of a space.
pub trait DefaultLocaleProvider {
    /// `None` means the space has no configured default.
    fn default_locale(&self, space: SpaceId) -> CollaboratorResult<Option<String>>;
}

/// Same default locale for every space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocale(pub String);

impl FixedLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self(locale.into())
    }
}

impl DefaultLocaleProvider for FixedLocale {
    fn default_locale(&self, _space: SpaceId) -> CollaboratorResult<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

/// Picks the value for one locale out of a per-field locale map.
pub trait LocaleSelector {
    fn select(&self, localized: &Value, locale: &str) -> Option<Value>;
}

/// Requested locale, then the fallback locale, then the first stored entry.
///
/// Values that are not locale maps are returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackLocaleSelector {
    fallback: String,
}

impl FallbackLocaleSelector {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl LocaleSelector for FallbackLocaleSelector {
    fn select(&self, localized: &Value, locale: &str) -> Option<Value> {
        let Value::Object(map) = localized else {
            return Some(localized.clone());
        };

        map.get(locale)
            .or_else(|| map.get(&self.fallback))
            .or_else(|| map.values().next())
            .cloned()
    }
}
