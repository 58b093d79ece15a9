//! Engine-wide error surface
//!
//! Each subsystem owns its error type; [`ContentError`] is what the write and
//! read paths return. Errors are either user-facing rejections (bad schema,
//! bad entry) or fatal internal failures (collaborator I/O, normalization)
//! that must abort the write with nothing persisted.

use std::fmt;

use thiserror::Error;

use crate::normalize::NormalizationError;
use crate::projection::ProjectionError;
use crate::providers::CollaboratorError;
use crate::schema::SchemaError;
use crate::validation::ValidationErrors;

/// Severity levels for engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected; fix the input and retry
    Reject,
    /// Internal failure; the operation is aborted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Result type for engine operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Any failure of the content engine.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Malformed schema definition
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Entry payload violates its schema
    #[error("entry validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Write-side transform failed on validated input
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// An external provider failed
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Malformed read options
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl ContentError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ContentError::Schema(e) => e.code(),
            ContentError::Validation(_) => ValidationErrors::CODE,
            ContentError::Normalization(e) => e.code(),
            ContentError::Collaborator(e) => e.code(),
            ContentError::Projection(e) => e.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ContentError::Schema(_) | ContentError::Validation(_) | ContentError::Projection(_) => {
                Severity::Reject
            }
            ContentError::Normalization(_) | ContentError::Collaborator(_) => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the path → messages map when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ContentError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
