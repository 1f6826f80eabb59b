//! SQLite-backed database service.
//!
//! [`Database`] owns the connection, the configuration and the completion
//! cache. It starts out uninitialized; [`Database::initialize_schema`] is the
//! only way to make it ready, and every other operation fails with
//! [`LogbookError::NotReady`] until then.

use std::path::Path;

use rusqlite::{Connection, Row};
use tracing::{debug, info};

use crate::{
    cache::CompletionCache,
    config::LogbookConfig,
    entry::{RowData, Value},
    error::{LogbookError, LogbookResult},
};

mod crud;
mod derive;
mod schema;
mod seed;
mod summary;
mod views;

pub use seed::SeedData;
pub use summary::Summary;
pub use views::{QueryFilter, QueryResult};

/// Lifecycle of a [`Database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Opened, schema not yet verified.
    Uninitialized,
    /// Schema verified; all operations available.
    Ready,
}

/// The logbook database service.
pub struct Database {
    conn: Connection,
    state: SchemaState,
    config: LogbookConfig,
    cache: CompletionCache,
}

impl Database {
    /// Opens or creates a logbook file at `path`.
    ///
    /// Enables WAL mode, `synchronous=NORMAL` and foreign key enforcement.
    pub fn open(path: impl AsRef<Path>, config: LogbookConfig) -> LogbookResult<Self> {
        config.validate()?;
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        info!(path = %path.display(), "logbook opened");
        Self::init_connection(conn, config)
    }

    /// Opens a private in-memory logbook.
    pub fn open_in_memory(config: LogbookConfig) -> LogbookResult<Self> {
        config.validate()?;
        let conn = Connection::open_in_memory()?;
        debug!("in-memory logbook opened");
        Self::init_connection(conn, config)
    }

    fn init_connection(conn: Connection, config: LogbookConfig) -> LogbookResult<Self> {
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        debug!("pragmas configured (synchronous=NORMAL, foreign_keys=ON)");
        Ok(Self {
            conn,
            state: SchemaState::Uninitialized,
            config,
            cache: CompletionCache::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchemaState {
        self.state
    }

    /// True once [`Database::initialize_schema`] has succeeded.
    pub fn is_ready(&self) -> bool {
        self.state == SchemaState::Ready
    }

    /// Configuration in effect.
    pub fn config(&self) -> &LogbookConfig {
        &self.config
    }

    /// Completion cache, for inspection.
    pub fn cache(&self) -> &CompletionCache {
        &self.cache
    }

    fn ensure_ready(&self) -> LogbookResult<()> {
        match self.state {
            SchemaState::Ready => Ok(()),
            SchemaState::Uninitialized => Err(LogbookError::NotReady),
        }
    }
}

/// Reads every column of `row` into a [`RowData`] keyed by `names`.
pub(crate) fn read_row(row: &Row<'_>, names: &[String]) -> rusqlite::Result<RowData> {
    let mut out = RowData::new();
    for (idx, name) in names.iter().enumerate() {
        out.insert(name.clone(), row.get::<_, Value>(idx)?);
    }
    Ok(out)
}
