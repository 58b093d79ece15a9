//! CLI module for aerocms
//!
//! Provides command-line access to the engine:
//! - compile: Canonicalize a schema document
//! - validate: Run the write path on an entry payload
//! - read: Shape a stored entry for output

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compile, read, run, run_command, validate, ValidateArgs};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, read_request, write_error, write_response};
