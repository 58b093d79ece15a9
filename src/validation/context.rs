//! Validation context
//!
//! Everything a validation or normalization pass may consult beyond the
//! schema and the document: the tenant space, the collaborators and the
//! engine configuration. Threaded explicitly through every call.

use crate::config::EngineConfig;
use crate::providers::{
    CollaboratorResult, DefaultLocaleProvider, ExistenceProvider, HashProvider, SpaceId,
};

/// Per-request context for the write path.
pub struct ValidationContext<'a> {
    space: SpaceId,
    existence: &'a dyn ExistenceProvider,
    hasher: &'a dyn HashProvider,
    locales: Option<&'a dyn DefaultLocaleProvider>,
    config: EngineConfig,
}

impl<'a> ValidationContext<'a> {
    pub fn new(space: SpaceId, existence: &'a dyn ExistenceProvider, hasher: &'a dyn HashProvider) -> Self {
        Self {
            space,
            existence,
            hasher,
            locales: None,
            config: EngineConfig::default(),
        }
    }

    pub fn with_locale_provider(mut self, locales: &'a dyn DefaultLocaleProvider) -> Self {
        self.locales = Some(locales);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn space(&self) -> SpaceId {
        self.space
    }

    pub fn existence(&self) -> &'a dyn ExistenceProvider {
        self.existence
    }

    pub fn hasher(&self) -> &'a dyn HashProvider {
        self.hasher
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The space's default locale, or the configured fallback.
    pub fn default_locale(&self) -> CollaboratorResult<String> {
        let resolved = match self.locales {
            Some(provider) => provider.default_locale(self.space)?,
            None => None,
        };

        Ok(resolved
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.config.fallback_locale.clone()))
    }
}
