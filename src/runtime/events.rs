//! Runtime event stream payloads.

use crate::types::{EntryKind, RowId};

/// Events emitted by the worker after a mutation committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogbookEvent {
    /// A new entry was stored.
    Inserted {
        /// Table of the entry.
        kind: EntryKind,
        /// Assigned row id.
        id: RowId,
    },
    /// An entry was replaced.
    Updated {
        /// Table of the entry.
        kind: EntryKind,
        /// Row id.
        id: RowId,
    },
    /// An entry was deleted.
    Removed {
        /// Table of the entry.
        kind: EntryKind,
        /// Former row id.
        id: RowId,
    },
}

impl LogbookEvent {
    /// Table the event concerns.
    pub fn kind(&self) -> EntryKind {
        match *self {
            LogbookEvent::Inserted { kind, .. }
            | LogbookEvent::Updated { kind, .. }
            | LogbookEvent::Removed { kind, .. } => kind,
        }
    }
}
