//! Typed logbook records and their mapping to and from column data.
//!
//! Every record kind implements [`LogbookEntry`]; [`Entry`] is the closed
//! tagged union the database service stores and returns.

/// Aircraft type reference records.
pub mod aircraft;
/// Airport reference records.
pub mod airport;
/// Qualification records.
pub mod currency;
/// Flight records and their derived durations.
pub mod flight;
/// Crew records.
pub mod pilot;
/// Column values and row readers.
pub mod row;
/// Simulator session records.
pub mod simulator;
/// Registered airframe records.
pub mod tail;

pub use aircraft::AircraftType;
pub use airport::{Airport, Coordinates};
pub use currency::Currency;
pub use flight::{Flight, FlightRecord, FlightTimes};
pub use pilot::Pilot;
pub use row::{RowData, Value};
pub use simulator::SimulatorSession;
pub use tail::Tail;

use crate::{
    error::{LogbookError, LogbookResult},
    types::{EntryKind, RowId},
};

/// Contract shared by every logbook record kind.
pub trait LogbookEntry: Sized {
    /// Record kind, which fixes table and id column.
    const KIND: EntryKind;

    /// Builds the entry from stored columns; derived columns are ignored.
    fn from_row(row: &RowData) -> LogbookResult<Self>;

    /// Column map for persistence; includes the id only once persisted.
    fn to_row(&self) -> RowData;

    /// Storage identifier, `None` until the entry has been inserted.
    fn row_id(&self) -> Option<RowId>;

    /// Records the identifier assigned by storage.
    fn set_row_id(&mut self, id: RowId);

    /// Names of required fields that are empty or out of range.
    fn invalid_fields(&self) -> Vec<&'static str>;

    /// Backing table.
    fn table_name(&self) -> &'static str {
        Self::KIND.table_name()
    }

    /// True once loaded from or written to storage.
    fn is_persisted(&self) -> bool {
        self.row_id().is_some()
    }

    /// Fails with `ValidationFailed` listing every invalid field.
    fn validate(&self) -> LogbookResult<()> {
        let fields = self.invalid_fields();
        if fields.is_empty() {
            return Ok(());
        }
        Err(LogbookError::ValidationFailed {
            table: Self::KIND.table_name(),
            fields: fields.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Any logbook record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Aircraft type.
    AircraftType(AircraftType),
    /// Tail.
    Tail(Tail),
    /// Pilot.
    Pilot(Pilot),
    /// Airport.
    Airport(Airport),
    /// Flight.
    Flight(Flight),
    /// Simulator session.
    Simulator(SimulatorSession),
    /// Currency.
    Currency(Currency),
}

macro_rules! dispatch {
    ($entry:expr, $inner:ident => $body:expr) => {
        match $entry {
            Entry::AircraftType($inner) => $body,
            Entry::Tail($inner) => $body,
            Entry::Pilot($inner) => $body,
            Entry::Airport($inner) => $body,
            Entry::Flight($inner) => $body,
            Entry::Simulator($inner) => $body,
            Entry::Currency($inner) => $body,
        }
    };
}

impl Entry {
    /// Reconstructs an entry of `kind` from stored columns.
    pub fn from_row(kind: EntryKind, row: &RowData) -> LogbookResult<Self> {
        Ok(match kind {
            EntryKind::AircraftType => Entry::AircraftType(AircraftType::from_row(row)?),
            EntryKind::Tail => Entry::Tail(Tail::from_row(row)?),
            EntryKind::Pilot => Entry::Pilot(Pilot::from_row(row)?),
            EntryKind::Airport => Entry::Airport(Airport::from_row(row)?),
            EntryKind::Flight => Entry::Flight(Flight::from_row(row)?),
            EntryKind::Simulator => Entry::Simulator(SimulatorSession::from_row(row)?),
            EntryKind::Currency => Entry::Currency(Currency::from_row(row)?),
        })
    }

    /// Kind tag.
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::AircraftType(_) => EntryKind::AircraftType,
            Entry::Tail(_) => EntryKind::Tail,
            Entry::Pilot(_) => EntryKind::Pilot,
            Entry::Airport(_) => EntryKind::Airport,
            Entry::Flight(_) => EntryKind::Flight,
            Entry::Simulator(_) => EntryKind::Simulator,
            Entry::Currency(_) => EntryKind::Currency,
        }
    }

    /// See [`LogbookEntry::to_row`].
    pub fn to_row(&self) -> RowData {
        dispatch!(self, e => e.to_row())
    }

    /// See [`LogbookEntry::row_id`].
    pub fn row_id(&self) -> Option<RowId> {
        dispatch!(self, e => e.row_id())
    }

    /// See [`LogbookEntry::set_row_id`].
    pub fn set_row_id(&mut self, id: RowId) {
        dispatch!(self, e => e.set_row_id(id))
    }

    /// See [`LogbookEntry::table_name`].
    pub fn table_name(&self) -> &'static str {
        self.kind().table_name()
    }

    /// See [`LogbookEntry::validate`].
    pub fn validate(&self) -> LogbookResult<()> {
        dispatch!(self, e => e.validate())
    }

    /// See [`LogbookEntry::is_persisted`].
    pub fn is_persisted(&self) -> bool {
        self.row_id().is_some()
    }
}

macro_rules! entry_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::$variant(value)
                }
            }
        )*
    };
}

entry_from!(
    AircraftType(AircraftType),
    Tail(Tail),
    Pilot(Pilot),
    Airport(Airport),
    Flight(Flight),
    Simulator(SimulatorSession),
    Currency(Currency),
);

/// Column names whose optional text is `Some("")`.
///
/// Storage reads an empty string back as absent, so such a value could not
/// survive a round trip.
pub(crate) fn blank_text(columns: &[(&'static str, Option<&str>)]) -> Vec<&'static str> {
    columns
        .iter()
        .filter(|(_, value)| *value == Some(""))
        .map(|(column, _)| *column)
        .collect()
}
