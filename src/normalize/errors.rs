//! Normalization errors
//!
//! Normalization runs on validated input, so these are internal failures:
//! the write is aborted and nothing is persisted.

use thiserror::Error;

use crate::errors::Severity;
use crate::providers::CollaboratorError;

/// Result type for normalization
pub type NormalizationResult<T> = Result<T, NormalizationError>;

/// Write-side transform failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// Hashing a secret field failed
    #[error("failed to hash '{path}': {source}")]
    Hash {
        path: String,
        #[source]
        source: CollaboratorError,
    },

    /// Value shape the validator should have rejected
    #[error("'{path}': expected {expected}")]
    UnexpectedShape { path: String, expected: &'static str },
}

impl NormalizationError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            NormalizationError::Hash { .. } => "CMS_NORMALIZATION_HASH_FAILED",
            NormalizationError::UnexpectedShape { .. } => "CMS_NORMALIZATION_UNEXPECTED_SHAPE",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}
