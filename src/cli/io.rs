//! JSON I/O handling for CLI
//!
//! - Input: JSON documents from files, or a single JSON object via stdin
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Map, Value};

use super::errors::{CliError, CliResult};
use crate::validation::ValidationErrors;

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Read a JSON document from a file
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::invalid_input(format!("Invalid JSON in '{}': {}", path.display(), e)))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, errors: Option<&ValidationErrors>) -> CliResult<()> {
    write_value(&error_response(code, message, errors))
}

pub(super) fn error_response(code: &str, message: &str, errors: Option<&ValidationErrors>) -> Value {
    let mut response = Map::new();
    response.insert("status".into(), json!("error"));
    response.insert("code".into(), json!(code));
    response.insert("message".into(), json!(message));
    if let Some(errors) = errors {
        response.insert("errors".into(), json!(errors));
    }
    Value::Object(response)
}

fn write_value(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
