//! CLI argument definitions using clap
//!
//! Commands:
//! - aerocms compile --schema <path>
//! - aerocms validate --schema <path> [--entry <path>] [--previous <path>] [--references <path>]
//! - aerocms read --schema <path> --entry <path> [--fields ..] [--max-depth ..] [--locale ..]
//!
//! When `--entry` is omitted from `validate`, the write payload is read from stdin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aerocms - schema-driven content validation and shaping
#[derive(Parser, Debug)]
#[command(name = "aerocms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a schema document and print its canonical form
    Compile {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,

        /// Path to engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate and normalize an entry write payload
    Validate {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,

        /// Path to the write payload `{status?, published_at?, data}`
        #[arg(long)]
        entry: Option<PathBuf>,

        /// Path to the stored data of the entry being updated
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Path to a reference catalog for relation/asset existence checks
        #[arg(long)]
        references: Option<PathBuf>,

        /// Tenant space the entry belongs to
        #[arg(long, default_value_t = 1)]
        space: i64,

        /// Default locale of the space
        #[arg(long)]
        default_locale: Option<String>,

        /// Path to engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Shape a stored entry for output
    Read {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,

        /// Path to the stored entry `{id, status, published_at, data}`
        #[arg(long)]
        entry: PathBuf,

        /// Comma-separated output keys
        #[arg(long)]
        fields: Option<String>,

        /// Container pruning depth (clamped to 0..=8)
        #[arg(long, allow_negative_numbers = true)]
        max_depth: Option<i64>,

        /// Locale to select for localized fields
        #[arg(long)]
        locale: Option<String>,

        /// Path to engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
