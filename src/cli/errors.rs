//! CLI-specific error types
//!
//! Engine errors keep their own codes; the CLI adds codes for the failures
//! that happen before the engine runs (config, file and stdin I/O).

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::errors::ContentError;
use crate::projection::ProjectionError;
use crate::providers::CollaboratorError;
use crate::schema::SchemaError;
use crate::validation::ValidationErrors;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Input file is not the expected JSON shape
    InvalidInput,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CMS_CLI_CONFIG_ERROR",
            Self::IoError => "CMS_CLI_IO_ERROR",
            Self::InvalidInput => "CMS_CLI_INVALID_INPUT",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub enum CliError {
    /// Failure of the CLI itself
    Cli { code: CliErrorCode, message: String },
    /// Failure reported by the content engine
    Content(ContentError),
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self::Cli {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed input file
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Cli { code, .. } => code.code(),
            Self::Content(e) => e.code(),
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Cli { message, .. } => message.clone(),
            Self::Content(e) => e.to_string(),
        }
    }

    /// Path → messages map for rejected entries
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Content(e) => e.validation_errors(),
            Self::Cli { .. } => None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<ContentError> for CliError {
    fn from(e: ContentError) -> Self {
        Self::Content(e)
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::Content(e.into())
    }
}

impl From<CollaboratorError> for CliError {
    fn from(e: CollaboratorError) -> Self {
        Self::Content(e.into())
    }
}

impl From<ProjectionError> for CliError {
    fn from(e: ProjectionError) -> Self {
        Self::Content(e.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
