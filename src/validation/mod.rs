//! Entry validation subsystem
//!
//! Validates candidate entry documents against compiled schemas by pure
//! recursive descent. Every call receives an explicit [`ValidationContext`];
//! nothing is cached between calls.
//!
//! # Design Principles
//!
//! - Validation is complete: every violation is reported, keyed by dotted path
//! - Validation is atomic: any violation rejects the whole document
//! - Existence checks are batched per field and scoped to the context's space
//! - Collaborator failures are fatal, never reported as violations

mod composite;
mod context;
mod errors;
mod references;
mod rules;
mod validator;

pub use context::ValidationContext;
pub use errors::ValidationErrors;
pub use rules::{HEX_COLOR_PATTERN, SLUG_PATTERN, TIME_PATTERN};
pub use validator::{EntryValidator, ValidatedDocument};

pub(crate) use rules::date_like;
