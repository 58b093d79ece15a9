//! Read-side shaping
//!
//! Turns a stored entry into its output form. Only the schema (for masking
//! and locale selection) and the stored document are consulted; references
//! are never expanded here.
//!
//! # Components
//!
//! - [`mask`]: password fields read back as `null`
//! - [`project`]: `fields=` projection over metadata and dotted data paths
//! - [`limit_depth`]: container pruning at a clamped depth
//! - [`select_locale`]: collapse locale maps through a `LocaleSelector`
//! - [`ReadProjector`]: all of the above, driven by [`ReadOptions`]

mod depth;
mod errors;
mod fields;
mod locale;
mod mask;
mod reader;

pub use depth::{clamp_depth, limit_depth};
pub use errors::{ProjectionError, ProjectionResult};
pub use fields::{parse_field_list, project, METADATA_KEYS};
pub use locale::select_locale;
pub use mask::mask;
pub use reader::{ReadOptions, ReadProjector};
