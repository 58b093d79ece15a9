//! Entry payloads and the write path
//!
//! Ties validation and normalization together for one entry write and
//! defines the stored-entry shape the read path consumes.

mod payload;
mod writer;

pub use payload::{EntryRecord, EntryStatus, PreparedEntry};
pub use writer::EntryWriter;
