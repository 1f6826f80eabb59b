//! Reference data imported once at first initialization.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    entry::{Entry, RowData},
    error::{LogbookError, LogbookResult},
    types::EntryKind,
};

use super::crud::insert_row;

/// Seed rows per reference table, in the same column format as stored rows.
///
/// ```json
/// { "aircraft_types": [{"make": "Airbus", "model": "A320"}],
///   "airports": [{"icao": "EDDF", "latitude": 50.03, "longitude": 8.57}] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    /// Aircraft type reference list.
    pub aircraft_types: Vec<RowData>,
    /// Starter airport list.
    pub airports: Vec<RowData>,
}

impl SeedData {
    /// Parses a JSON seed document.
    pub fn from_json_str(input: &str) -> LogbookResult<Self> {
        serde_json::from_str(input).map_err(|e| LogbookError::Schema(format!("seed data: {e}")))
    }
}

/// Inserts every seed row of `kind`, failing on the first unusable one.
///
/// Rows go through the entry model, so unknown columns are dropped and each
/// row must validate. Ids given in the seed are kept.
pub(super) fn import(conn: &Connection, kind: EntryKind, rows: &[RowData]) -> LogbookResult<usize> {
    for (idx, row) in rows.iter().enumerate() {
        let invalid = |e: LogbookError| {
            LogbookError::Schema(format!("seed {} row {idx}: {e}", kind.table_name()))
        };
        let entry = Entry::from_row(kind, row).map_err(invalid)?;
        entry.validate().map_err(invalid)?;
        insert_row(conn, kind.table_name(), &entry.to_row()).map_err(invalid)?;
    }
    Ok(rows.len())
}
