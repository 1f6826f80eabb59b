//! Error taxonomy shared by the entry model, calculation engine and database service.

use thiserror::Error;

use crate::{
    calc::CalcError,
    config::ConfigError,
    types::{EntryKind, RowId},
};

/// Errors surfaced by logbook operations.
#[derive(Debug, Error)]
pub enum LogbookError {
    /// A stored row could not be turned back into a typed entry.
    #[error("malformed {table} row: column `{column}` {reason}")]
    MalformedRow {
        /// Table the row came from.
        table: &'static str,
        /// Offending column.
        column: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Block or night time inputs are inconsistent.
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),
    /// Storage structure is missing, incompatible, or seed data is unusable.
    #[error("schema error: {0}")]
    Schema(String),
    /// No row with this identifier exists.
    #[error("{kind} entry {id} not found")]
    NotFound {
        /// Table searched.
        kind: EntryKind,
        /// Identifier requested.
        id: RowId,
    },
    /// The schema has not been initialized on this connection yet.
    #[error("database schema is not initialized")]
    NotReady,
    /// Required fields are missing or references do not resolve.
    #[error("invalid {table} entry: {}", fields.join(", "))]
    ValidationFailed {
        /// Table of the rejected entry.
        table: &'static str,
        /// Names of the invalid fields.
        fields: Vec<String>,
    },
    /// Deleting the entry, or changing the key others use to reach it, would
    /// break rows that still reference it.
    #[error("{kind} entry {id} is still referenced by {} row(s)", referenced_by.len())]
    Conflict {
        /// Table of the referenced entry.
        kind: EntryKind,
        /// Identifier of that entry.
        id: RowId,
        /// Row ids of the referencing entries.
        referenced_by: Vec<RowId>,
    },
    /// Underlying SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<CalcError> for LogbookError {
    fn from(value: CalcError) -> Self {
        match value {
            CalcError::InvalidTimeRange(msg) => Self::InvalidTimeRange(msg),
        }
    }
}

/// Result alias used across the crate.
pub type LogbookResult<T> = Result<T, LogbookError>;
