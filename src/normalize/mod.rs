//! Write-side normalization
//!
//! Runs after validation and before persistence. Applies the side effects a
//! field type implies: locale wrapping, secret hashing, slug derivation.
//! Operates on a [`ValidatedDocument`](crate::validation::ValidatedDocument)
//! only, so shape errors here are internal failures rather than rejections.

mod errors;
mod normalizer;
mod slug;

pub use errors::{NormalizationError, NormalizationResult};
pub use normalizer::EntryNormalizer;
pub use slug::slugify;
