//! Read-side errors

use thiserror::Error;

use crate::errors::Severity;

/// Result type for read shaping
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Malformed read options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("invalid value '{value}' for read option '{name}'")]
    InvalidOption { name: &'static str, value: String },
}

impl ProjectionError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ProjectionError::InvalidOption { .. } => "CMS_READ_INVALID_OPTION",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}
