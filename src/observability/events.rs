//! Observable engine events
//!
//! One event per schema compile, field lifecycle change, write-path stage and
//! read shaping call. Events are explicit and typed.

use std::fmt;

/// Observable events in the content engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema definition
    /// Schema document compiled
    SchemaCompiled,
    /// Schema document rejected
    SchemaRejected,
    /// Field appended to a schema
    FieldAdded,
    /// Field merge-patched
    FieldUpdated,
    /// Field removed from a schema
    FieldDeleted,

    // Write path
    /// Entry payload passed validation
    EntryValidated,
    /// Entry payload rejected
    EntryRejected,
    /// Validated entry normalized for persistence
    EntryNormalized,

    // Read path
    /// Stored entry shaped for output
    EntryShaped,

    // Collaborators
    /// External provider failed (FATAL for the operation)
    CollaboratorFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaCompiled => "SCHEMA_COMPILED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::FieldAdded => "FIELD_ADDED",
            Event::FieldUpdated => "FIELD_UPDATED",
            Event::FieldDeleted => "FIELD_DELETED",
            Event::EntryValidated => "ENTRY_VALIDATED",
            Event::EntryRejected => "ENTRY_REJECTED",
            Event::EntryNormalized => "ENTRY_NORMALIZED",
            Event::EntryShaped => "ENTRY_SHAPED",
            Event::CollaboratorFailed => "COLLABORATOR_FAILED",
        }
    }

    /// Returns true if this event aborts the operation it belongs to
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CollaboratorFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
