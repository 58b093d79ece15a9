//! Schema subsystem
//!
//! Administrator-authored schema documents are compiled once, at definition
//! time, into canonical field trees that drive entry validation, write-side
//! normalization and read-side masking.
//!
//! # Design Principles
//!
//! - `handle` is the only field identity, end to end
//! - Compilation is all-or-nothing: the first malformed definition rejects the schema
//! - Nesting (repeater, layout) is a recursive sum type with a bounded depth
//! - Canonical output recompiles to itself

mod compiler;
mod errors;
mod lifecycle;
mod types;

pub use compiler::{SchemaCompiler, DEFAULT_MAX_NESTING_DEPTH};
pub use errors::{SchemaError, SchemaResult};
pub use lifecycle::merge_patch;
pub use types::{
    humanize, Block, FieldDescriptor, FieldKind, OptionSet, RelationSpec, Schema, FIELD_TYPES,
    LOCALIZABLE_TYPES, SCHEMA_KINDS,
};
