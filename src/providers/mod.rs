//! External collaborators
//!
//! The engine holds no ambient state: everything it needs from the outside
//! world (existence of referenced ids, a space's default locale, one-way
//! hashing) arrives through these traits, threaded explicitly via the
//! validation context.

mod errors;
mod existence;
mod hash;
mod locale;
mod memory;

pub use errors::{CollaboratorError, CollaboratorResult};
pub use existence::{CollectionId, ExistenceProvider, ReferenceTarget, SpaceId};
pub use hash::{Argon2Hasher, HashProvider};
pub use locale::{DefaultLocaleProvider, FallbackLocaleSelector, FixedLocale, LocaleSelector};
pub use memory::{AssetFixture, CatalogFile, CollectionFixture, ReferenceCatalog, SpaceFixture};
