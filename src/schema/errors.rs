//! Schema definition errors
//!
//! Error codes:
//! - CMS_SCHEMA_INVALID_FIELD (REJECT)
//! - CMS_SCHEMA_INVALID_BLOCK (REJECT)
//! - CMS_SCHEMA_DUPLICATE_HANDLE (REJECT)
//! - CMS_SCHEMA_INVALID_DOCUMENT (REJECT)
//! - CMS_SCHEMA_TOO_DEEP (REJECT)
//! - CMS_SCHEMA_UNKNOWN_FIELD (REJECT)
//!
//! Every schema error is user-facing and recoverable: the administrator fixes
//! the definition and resubmits.

use thiserror::Error;

use crate::errors::Severity;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Malformed field, block or schema definition.
///
/// `path` locates the offending definition, e.g. `fields[2].blocks[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field definition is malformed
    #[error("{path}: {message}")]
    InvalidField { path: String, message: String },

    /// Layout block definition is malformed
    #[error("{path}: {message}")]
    InvalidBlock { path: String, message: String },

    /// Two siblings share a handle, or two blocks share a type
    #[error("{path}: duplicate {what} '{name}'")]
    Duplicate {
        path: String,
        what: &'static str,
        name: String,
    },

    /// Top-level schema document is malformed
    #[error("schema: {0}")]
    InvalidDocument(String),

    /// Repeater/layout nesting exceeds the configured limit
    #[error("{path}: nesting deeper than {limit} levels")]
    TooDeep { path: String, limit: usize },

    /// Lifecycle operation names a field that does not exist
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

impl SchemaError {
    pub fn invalid_field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_block(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBlock {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_handle(path: impl Into<String>, handle: impl Into<String>) -> Self {
        Self::Duplicate {
            path: path.into(),
            what: "handle",
            name: handle.into(),
        }
    }

    pub fn duplicate_block(path: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self::Duplicate {
            path: path.into(),
            what: "block type",
            name: block_type.into(),
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidField { .. } => "CMS_SCHEMA_INVALID_FIELD",
            SchemaError::InvalidBlock { .. } => "CMS_SCHEMA_INVALID_BLOCK",
            SchemaError::Duplicate { .. } => "CMS_SCHEMA_DUPLICATE_HANDLE",
            SchemaError::InvalidDocument(_) => "CMS_SCHEMA_INVALID_DOCUMENT",
            SchemaError::TooDeep { .. } => "CMS_SCHEMA_TOO_DEEP",
            SchemaError::UnknownField(_) => "CMS_SCHEMA_UNKNOWN_FIELD",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    /// Returns the definition path, if the error is tied to one
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::InvalidField { path, .. }
            | SchemaError::InvalidBlock { path, .. }
            | SchemaError::Duplicate { path, .. }
            | SchemaError::TooDeep { path, .. } => Some(path),
            SchemaError::InvalidDocument(_) | SchemaError::UnknownField(_) => None,
        }
    }
}
