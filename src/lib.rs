//! aerocms - schema-driven content validation and normalization
//!
//! The content engine of a multi-tenant headless CMS:
//!
//! - [`schema`]: compile administrator-authored field schemas
//! - [`validation`]: validate entry payloads against compiled schemas
//! - [`normalize`]: apply field-type side effects before persistence
//! - [`projection`]: shape stored entries for output
//!
//! Tenant scope, reference existence, default locales and hashing come from
//! caller-supplied [`providers`]; the engine itself holds no state.

pub mod cli;
pub mod config;
pub mod entry;
pub mod errors;
pub mod normalize;
pub mod observability;
pub mod projection;
pub mod providers;
pub mod schema;
pub mod validation;

pub use config::EngineConfig;
pub use errors::{ContentError, ContentResult, Severity};
