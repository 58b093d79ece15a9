//! CLI command implementations
//!
//! Each command loads its inputs from files, runs one engine operation and
//! returns the response `data`. `run` owns the stdout protocol: one JSON
//! object per invocation, `{status: "ok", data}` or
//! `{status: "error", code, message, errors?}`.

use std::path::Path;

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::entry::{EntryRecord, EntryWriter};
use crate::projection::{ReadOptions, ReadProjector};
use crate::providers::{
    Argon2Hasher, FallbackLocaleSelector, FixedLocale, ReferenceCatalog, SpaceId,
};
use crate::schema::{Schema, SchemaCompiler};
use crate::validation::ValidationContext;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, dispatches, and writes the response. Failures are
/// reported on stdout and returned so the binary exits non-zero.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();

    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), &e.message(), e.validation_errors())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Compile { schema, config } => compile(&schema, config.as_deref()),
        Command::Validate {
            schema,
            entry,
            previous,
            references,
            space,
            default_locale,
            config,
        } => validate(ValidateArgs {
            schema: &schema,
            entry: entry.as_deref(),
            previous: previous.as_deref(),
            references: references.as_deref(),
            space: SpaceId(space),
            default_locale: default_locale.as_deref(),
            config: config.as_deref(),
        }),
        Command::Read {
            schema,
            entry,
            fields,
            max_depth,
            locale,
            config,
        } => {
            let mut options = ReadOptions::default();
            if let Some(fields) = fields {
                options = options.with_fields(fields);
            }
            if let Some(depth) = max_depth {
                options = options.with_max_depth(depth);
            }
            if let Some(locale) = locale {
                options = options.with_locale(locale);
            }
            read(&schema, &entry, &options, config.as_deref())
        }
    }
}

/// Compile a schema document to its canonical form
pub fn compile(schema_path: &Path, config_path: Option<&Path>) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let schema = load_schema(schema_path, &config)?;
    Ok(schema.to_value())
}

/// Inputs of the `validate` command
pub struct ValidateArgs<'p> {
    pub schema: &'p Path,
    /// `None` reads the payload from stdin
    pub entry: Option<&'p Path>,
    pub previous: Option<&'p Path>,
    pub references: Option<&'p Path>,
    pub space: SpaceId,
    pub default_locale: Option<&'p str>,
    pub config: Option<&'p Path>,
}

/// Validate and normalize a write payload
///
/// Without a reference catalog every relation and asset id fails its
/// existence check.
pub fn validate(args: ValidateArgs<'_>) -> CliResult<Value> {
    let config = load_config(args.config)?;
    let schema = load_schema(args.schema, &config)?;

    let payload = match args.entry {
        Some(path) => read_json_file(path)?,
        None => read_request()?,
    };

    let previous = match args.previous {
        Some(path) => Some(as_object(read_json_file(path)?, path)?),
        None => None,
    };

    let catalog = match args.references {
        Some(path) => ReferenceCatalog::load(path)?,
        None => ReferenceCatalog::new(),
    };

    let hasher = Argon2Hasher::new();
    let locales = args.default_locale.map(FixedLocale::new);

    let mut ctx = ValidationContext::new(args.space, &catalog, &hasher).with_config(config);
    if let Some(locales) = &locales {
        ctx = ctx.with_locale_provider(locales);
    }

    let prepared = EntryWriter::new(&ctx).prepare(&schema, &payload, previous.as_ref())?;
    Ok(serde_json::to_value(&prepared)?)
}

/// Shape a stored entry for output
pub fn read(
    schema_path: &Path,
    entry_path: &Path,
    options: &ReadOptions,
    config_path: Option<&Path>,
) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let schema = load_schema(schema_path, &config)?;

    let entry: EntryRecord = serde_json::from_value(read_json_file(entry_path)?)?;

    let selector = FallbackLocaleSelector::new(config.fallback_locale.clone());
    let projector = ReadProjector::from_config(&config, &selector);
    Ok(projector.shape(&entry, &schema, options))
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn load_schema(path: &Path, config: &EngineConfig) -> CliResult<Schema> {
    let raw = read_json_file(path)?;
    Ok(SchemaCompiler::from_config(config).compile_schema(&raw)?)
}

fn as_object(value: Value, path: &Path) -> CliResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::invalid_input(format!(
            "'{}' must contain a JSON object",
            path.display()
        ))),
    }
}
