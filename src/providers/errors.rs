//! Collaborator errors
//!
//! Failures of external providers are internal and fatal for the operation:
//! the write is aborted and nothing is persisted. Nothing is retried here.

use thiserror::Error;

use crate::errors::Severity;

/// Result type for collaborator calls
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// External provider failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Existence provider (relations, assets) unavailable
    #[error("existence provider failed: {0}")]
    Existence(String),

    /// Default-locale provider unavailable
    #[error("default locale provider failed: {0}")]
    Locale(String),

    /// Hash provider unavailable
    #[error("hash provider failed: {0}")]
    Hash(String),
}

impl CollaboratorError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            CollaboratorError::Existence(_) => "CMS_COLLABORATOR_EXISTENCE",
            CollaboratorError::Locale(_) => "CMS_COLLABORATOR_LOCALE",
            CollaboratorError::Hash(_) => "CMS_COLLABORATOR_HASH",
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            CollaboratorError::Existence(_) => "existence",
            CollaboratorError::Locale(_) => "locale",
            CollaboratorError::Hash(_) => "hash",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}
