use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    calc::{CurrencyState, Totals},
    db::{Database, QueryFilter, QueryResult, Summary},
    entry::{Entry, FlightRecord},
    error::{LogbookError, LogbookResult},
    types::{CompletionTarget, EntryKind, LogbookView, RowId, TimeFrame},
};

use super::events::LogbookEvent;

/// Failures seen through a [`LogbookHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Logbook(#[from] LogbookError),
    #[error("logbook worker is not running")]
    ChannelClosed,
}

/// Queue sizes of the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command_queue_bound: usize,
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable async front of the single writer worker.
#[derive(Clone)]
pub struct LogbookHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LogbookEvent>,
}

type Reply<T> = oneshot::Sender<LogbookResult<T>>;

enum Command {
    Insert {
        entry: Entry,
        resp: Reply<RowId>,
    },
    Update {
        entry: Entry,
        resp: Reply<()>,
    },
    Remove {
        kind: EntryKind,
        id: RowId,
        resp: Reply<()>,
    },
    Get {
        kind: EntryKind,
        id: RowId,
        resp: Reply<Entry>,
    },
    FlightRecords {
        filter: QueryFilter,
        resp: Reply<Vec<FlightRecord>>,
    },
    Query {
        view: LogbookView,
        filter: QueryFilter,
        resp: Reply<QueryResult>,
    },
    Summary {
        resp: Reply<Summary>,
    },
    Totals {
        frame: TimeFrame,
        today: NaiveDate,
        resp: Reply<Totals>,
    },
    Completions {
        target: CompletionTarget,
        resp: Reply<Vec<String>>,
    },
    CurrencyStates {
        today: NaiveDate,
        resp: Reply<Vec<CurrencyState>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `db` onto a blocking worker thread and returns its handle.
///
/// Commands run one at a time in arrival order, so at most one mutation is
/// ever in flight. Must be called inside a tokio runtime.
pub fn spawn_logbook(db: Database, config: RuntimeConfig) -> LogbookHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<LogbookEvent>(config.event_capacity.max(1));
    let events_tx_loop = events_tx.clone();

    tokio::task::spawn_blocking(move || {
        let mut db = db;
        info!("logbook worker started");
        while let Some(cmd) = cmd_rx.blocking_recv() {
            if handle_command(cmd, &mut db, &events_tx_loop) {
                break;
            }
        }
        info!("logbook worker stopped");
    });

    LogbookHandle { cmd_tx, events_tx }
}

fn handle_command(
    cmd: Command,
    db: &mut Database,
    events_tx: &broadcast::Sender<LogbookEvent>,
) -> bool {
    match cmd {
        Command::Insert { entry, resp } => {
            let kind = entry.kind();
            let res = db.insert(&entry);
            if let Ok(id) = res {
                let _ = events_tx.send(LogbookEvent::Inserted { kind, id });
            }
            let _ = resp.send(res);
        }
        Command::Update { entry, resp } => {
            let kind = entry.kind();
            let res = db.update(&entry);
            if let (Ok(()), Some(id)) = (&res, entry.row_id()) {
                let _ = events_tx.send(LogbookEvent::Updated { kind, id });
            }
            let _ = resp.send(res);
        }
        Command::Remove { kind, id, resp } => {
            let res = db.remove(kind, id);
            if res.is_ok() {
                let _ = events_tx.send(LogbookEvent::Removed { kind, id });
            }
            let _ = resp.send(res);
        }
        Command::Get { kind, id, resp } => {
            let _ = resp.send(db.get_entry(kind, id));
        }
        Command::FlightRecords { filter, resp } => {
            let _ = resp.send(db.flight_records(&filter));
        }
        Command::Query { view, filter, resp } => {
            let _ = resp.send(db.query(view, &filter));
        }
        Command::Summary { resp } => {
            let _ = resp.send(db.summary());
        }
        Command::Totals { frame, today, resp } => {
            let _ = resp.send(db.totals(frame, today));
        }
        Command::Completions { target, resp } => {
            let _ = resp.send(db.completions(target));
        }
        Command::CurrencyStates { today, resp } => {
            let _ = resp.send(db.currency_states(today));
        }
        Command::Shutdown { resp } => {
            debug!("shutdown requested");
            let _ = resp.send(());
            return true;
        }
    }
    false
}

impl LogbookHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<LogbookEvent> {
        self.events_tx.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        let res = rx.await.map_err(|_| RuntimeError::ChannelClosed)?;
        Ok(res?)
    }

    pub async fn insert(&self, entry: impl Into<Entry>) -> Result<RowId, RuntimeError> {
        let entry = entry.into();
        self.request(|resp| Command::Insert { entry, resp }).await
    }

    pub async fn update(&self, entry: impl Into<Entry>) -> Result<(), RuntimeError> {
        let entry = entry.into();
        self.request(|resp| Command::Update { entry, resp }).await
    }

    pub async fn remove(&self, kind: EntryKind, id: RowId) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Remove { kind, id, resp }).await
    }

    pub async fn get(&self, kind: EntryKind, id: RowId) -> Result<Entry, RuntimeError> {
        self.request(|resp| Command::Get { kind, id, resp }).await
    }

    pub async fn flight_records(
        &self,
        filter: QueryFilter,
    ) -> Result<Vec<FlightRecord>, RuntimeError> {
        self.request(|resp| Command::FlightRecords { filter, resp }).await
    }

    pub async fn query(
        &self,
        view: LogbookView,
        filter: QueryFilter,
    ) -> Result<QueryResult, RuntimeError> {
        self.request(|resp| Command::Query { view, filter, resp }).await
    }

    pub async fn summary(&self) -> Result<Summary, RuntimeError> {
        self.request(|resp| Command::Summary { resp }).await
    }

    pub async fn totals(&self, frame: TimeFrame, today: NaiveDate) -> Result<Totals, RuntimeError> {
        self.request(|resp| Command::Totals { frame, today, resp }).await
    }

    pub async fn completions(&self, target: CompletionTarget) -> Result<Vec<String>, RuntimeError> {
        self.request(|resp| Command::Completions { target, resp }).await
    }

    pub async fn currency_states(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<CurrencyState>, RuntimeError> {
        self.request(|resp| Command::CurrencyStates { today, resp }).await
    }

    /// Stops the worker after the commands queued before this one.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}
