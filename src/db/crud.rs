//! Insert, update, remove and lookup of single entries.

use rusqlite::{Connection, OptionalExtension, Params, params, params_from_iter};
use tracing::{debug, info};

use crate::{
    entry::{Entry, Flight, FlightRecord, FlightTimes, LogbookEntry, RowData, Tail, Value},
    error::{LogbookError, LogbookResult},
    types::{EntryKind, RowId},
};

use super::{Database, QueryFilter, derive::TimeDeriver, read_row};

pub(super) fn insert_row(conn: &Connection, table: &str, row: &RowData) -> LogbookResult<RowId> {
    let columns: Vec<&str> = row.keys().map(String::as_str).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(row.values()))?;
    Ok(conn.last_insert_rowid())
}

fn update_row(conn: &Connection, kind: EntryKind, id: RowId, row: &RowData) -> LogbookResult<()> {
    let id_column = kind.id_column();
    let pairs: Vec<(&String, &Value)> =
        row.iter().filter(|(k, _)| k.as_str() != id_column).collect();
    let assignments: Vec<String> = pairs
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {id_column} = ?{}",
        kind.table_name(),
        assignments.join(", "),
        pairs.len() + 1
    );
    let values = pairs
        .iter()
        .map(|(_, v)| (*v).clone())
        .chain(std::iter::once(Value::Integer(id)));
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

pub(super) fn select_rows<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> LogbookResult<Vec<RowData>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
    let rows = stmt
        .query_map(params, |row| read_row(row, &names))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn ids<P: Params>(conn: &Connection, sql: &str, params: P) -> LogbookResult<Vec<RowId>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(params, |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<RowId>>>()?;
    Ok(ids)
}

fn exists(conn: &Connection, kind: EntryKind, id: RowId) -> LogbookResult<bool> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ?1",
        kind.table_name(),
        kind.id_column()
    );
    Ok(conn.query_row(&sql, params![id], |_| Ok(())).optional()?.is_some())
}

/// True if another row than `own` already holds `value` in `column`.
fn taken(
    conn: &Connection,
    kind: EntryKind,
    column: &str,
    value: &str,
    own: Option<RowId>,
) -> LogbookResult<bool> {
    let sql = format!(
        "SELECT 1 FROM {table} WHERE {column} = ?1 AND (?2 IS NULL OR {id} <> ?2)",
        table = kind.table_name(),
        id = kind.id_column(),
    );
    Ok(conn
        .query_row(&sql, params![value, own], |_| Ok(()))
        .optional()?
        .is_some())
}

const AIRPORT_ICAO: &str = "SELECT icao FROM airports WHERE airport_id = ?1";
const FLIGHTS_AT_AIRPORT: &str =
    "SELECT flight_id FROM flights WHERE departure = ?1 OR destination = ?1 ORDER BY flight_id";

/// Rows that keep `kind`/`id` from being removed.
fn referencing_rows(conn: &Connection, kind: EntryKind, id: RowId) -> LogbookResult<Vec<RowId>> {
    match kind {
        EntryKind::Pilot => ids(
            conn,
            "SELECT flight_id FROM flights \
             WHERE pic_id = ?1 OR second_pilot_id = ?1 OR third_pilot_id = ?1 ORDER BY flight_id",
            params![id],
        ),
        EntryKind::Tail => ids(
            conn,
            "SELECT flight_id FROM flights WHERE tail_id = ?1 ORDER BY flight_id",
            params![id],
        ),
        EntryKind::AircraftType => ids(
            conn,
            "SELECT tail_id FROM tails WHERE aircraft_type_id = ?1 ORDER BY tail_id",
            params![id],
        ),
        EntryKind::Airport => {
            let icao: Option<String> = conn
                .query_row(AIRPORT_ICAO, params![id], |row| row.get(0))
                .optional()?;
            match icao {
                Some(icao) => ids(conn, FLIGHTS_AT_AIRPORT, params![icao]),
                None => Ok(Vec::new()),
            }
        }
        EntryKind::Flight | EntryKind::Simulator | EntryKind::Currency => Ok(Vec::new()),
    }
}

/// Recomputes and stores the derived columns of flights matched by `filter`.
pub(super) fn refresh_where<P: Params>(
    conn: &Connection,
    night_angle_deg: f64,
    filter: &str,
    params: P,
) -> LogbookResult<usize> {
    let rows = select_rows(conn, &format!("SELECT * FROM flights WHERE {filter}"), params)?;
    let mut deriver = TimeDeriver::new(conn, night_angle_deg);
    let assignments: Vec<String> = FlightTimes::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE flights SET {} WHERE flight_id = ?{}",
        assignments.join(", "),
        FlightTimes::COLUMNS.len() + 1
    );
    let mut stmt = conn.prepare(&sql)?;
    for row in &rows {
        let flight = Flight::from_row(row)?;
        let Some(id) = flight.id else { continue };
        let times = deriver.times(&flight)?;
        let values = times
            .values()
            .into_iter()
            .map(i64::from)
            .chain(std::iter::once(id));
        stmt.execute(params_from_iter(values))?;
    }
    Ok(rows.len())
}

impl Database {
    /// Validates and stores a new entry, returning its row id.
    ///
    /// Flights are stored together with their derived durations.
    pub fn insert(&mut self, entry: &Entry) -> LogbookResult<RowId> {
        self.ensure_ready()?;
        let kind = entry.kind();
        if entry.is_persisted() {
            return Err(LogbookError::ValidationFailed {
                table: kind.table_name(),
                fields: vec![kind.id_column().to_string()],
            });
        }
        entry.validate()?;
        self.check_references(entry, None)?;

        let row = self.row_with_derived(entry)?;
        let id = insert_row(&self.conn, kind.table_name(), &row)?;
        self.cache.invalidate_kind(kind);
        debug!(table = kind.table_name(), id, "entry inserted");
        Ok(id)
    }

    /// Replaces the stored entry with the same row id.
    ///
    /// Changing an airport, tail or aircraft type recomputes the derived
    /// durations of every flight depending on it.
    pub fn update(&mut self, entry: &Entry) -> LogbookResult<()> {
        self.ensure_ready()?;
        let kind = entry.kind();
        let id = entry.row_id().ok_or_else(|| LogbookError::ValidationFailed {
            table: kind.table_name(),
            fields: vec![kind.id_column().to_string()],
        })?;
        entry.validate()?;
        if !exists(&self.conn, kind, id)? {
            return Err(LogbookError::NotFound { kind, id });
        }
        self.check_references(entry, Some(id))?;
        if let Entry::Airport(airport) = entry {
            self.check_icao_rename(id, &airport.icao)?;
        }

        let row = self.row_with_derived(entry)?;
        let night_angle = self.config.night_angle_deg;
        let tx = self.conn.transaction()?;
        update_row(&tx, kind, id, &row)?;
        let refreshed = match entry {
            Entry::Airport(airport) => refresh_where(
                &tx,
                night_angle,
                "departure = ?1 OR destination = ?1",
                params![airport.icao],
            )?,
            Entry::Tail(_) => refresh_where(&tx, night_angle, "tail_id = ?1", params![id])?,
            Entry::AircraftType(_) => refresh_where(
                &tx,
                night_angle,
                "tail_id IN (SELECT tail_id FROM tails WHERE aircraft_type_id = ?1)",
                params![id],
            )?,
            _ => 0,
        };
        tx.commit()?;

        self.cache.invalidate_kind(kind);
        debug!(table = kind.table_name(), id, refreshed, "entry updated");
        Ok(())
    }

    /// Deletes an entry.
    ///
    /// Pilots, tails, airports and aircraft types that are still referenced
    /// are not removed; the call fails with [`LogbookError::Conflict`].
    pub fn remove(&mut self, kind: EntryKind, id: RowId) -> LogbookResult<()> {
        self.ensure_ready()?;
        if !exists(&self.conn, kind, id)? {
            return Err(LogbookError::NotFound { kind, id });
        }
        let referenced_by = referencing_rows(&self.conn, kind, id)?;
        if !referenced_by.is_empty() {
            info!(table = kind.table_name(), id, refs = referenced_by.len(), "removal blocked");
            return Err(LogbookError::Conflict {
                kind,
                id,
                referenced_by,
            });
        }
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            kind.table_name(),
            kind.id_column()
        );
        self.conn.execute(&sql, params![id])?;
        self.cache.invalidate_kind(kind);
        debug!(table = kind.table_name(), id, "entry removed");
        Ok(())
    }

    /// Loads one entry.
    pub fn get_entry(&self, kind: EntryKind, id: RowId) -> LogbookResult<Entry> {
        self.ensure_ready()?;
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1",
            kind.table_name(),
            kind.id_column()
        );
        let row = select_rows(&self.conn, &sql, params![id])?
            .pop()
            .ok_or(LogbookError::NotFound { kind, id })?;
        Entry::from_row(kind, &row)
    }

    /// Loads one flight with freshly derived durations.
    pub fn flight_record(&self, id: RowId) -> LogbookResult<FlightRecord> {
        let Entry::Flight(flight) = self.get_entry(EntryKind::Flight, id)? else {
            return Err(LogbookError::NotFound {
                kind: EntryKind::Flight,
                id,
            });
        };
        let times = TimeDeriver::new(&self.conn, self.config.night_angle_deg).times(&flight)?;
        Ok(FlightRecord { flight, times })
    }

    /// Flights inside `filter`, newest first, with freshly derived durations.
    pub fn flight_records(&self, filter: &QueryFilter) -> LogbookResult<Vec<FlightRecord>> {
        self.ensure_ready()?;
        let sql = format!(
            "SELECT * FROM flights WHERE {} ORDER BY date DESC, flight_id DESC",
            QueryFilter::CONDITION
        );
        let rows = select_rows(&self.conn, &sql, params_from_iter(filter.params()))?;
        let mut deriver = TimeDeriver::new(&self.conn, self.config.night_angle_deg);
        rows.iter()
            .map(|row| -> LogbookResult<FlightRecord> {
                let flight = Flight::from_row(row)?;
                let times = deriver.times(&flight)?;
                Ok(FlightRecord { flight, times })
            })
            .collect()
    }

    /// Recomputes the stored derived durations of every flight.
    ///
    /// Needed after the night angle changed or airport data was imported
    /// outside this service.
    pub fn refresh_derived_times(&mut self) -> LogbookResult<usize> {
        self.ensure_ready()?;
        let night_angle = self.config.night_angle_deg;
        let tx = self.conn.transaction()?;
        let n = refresh_where(&tx, night_angle, "1 = 1", params![])?;
        tx.commit()?;
        info!(flights = n, "derived times refreshed");
        Ok(n)
    }

    fn row_with_derived(&self, entry: &Entry) -> LogbookResult<RowData> {
        let mut row = entry.to_row();
        if let Entry::Flight(flight) = entry {
            let times = TimeDeriver::new(&self.conn, self.config.night_angle_deg).times(flight)?;
            for (col, v) in FlightTimes::COLUMNS.iter().zip(times.values()) {
                row.insert((*col).to_string(), Value::from(v));
            }
        }
        Ok(row)
    }

    /// Fails with `ValidationFailed` naming every reference that does not
    /// resolve and every unique value already taken by another row.
    fn check_references(&self, entry: &Entry, own: Option<RowId>) -> LogbookResult<()> {
        let conn = &self.conn;
        let mut missing: Vec<&'static str> = Vec::new();
        match entry {
            Entry::Tail(tail) => {
                if let Some(type_id) = tail.aircraft_type_id {
                    if !exists(conn, EntryKind::AircraftType, type_id)? {
                        missing.push(Tail::AIRCRAFT_TYPE);
                    }
                }
                if taken(conn, EntryKind::Tail, "registration", &tail.registration, own)? {
                    missing.push("registration");
                }
            }
            Entry::Airport(airport) => {
                if taken(conn, EntryKind::Airport, "icao", &airport.icao, own)? {
                    missing.push("icao");
                }
            }
            Entry::Flight(flight) => {
                for (column, pilot) in [
                    (Flight::PIC, flight.pic),
                    (Flight::SECOND_PILOT, flight.second_pilot),
                    (Flight::THIRD_PILOT, flight.third_pilot),
                ] {
                    if let Some(pilot) = pilot {
                        if !exists(conn, EntryKind::Pilot, pilot)? {
                            missing.push(column);
                        }
                    }
                }
                if let Some(tail) = flight.tail {
                    if !exists(conn, EntryKind::Tail, tail)? {
                        missing.push(Flight::TAIL);
                    }
                }
                for (column, icao) in [
                    (Flight::DEPARTURE, &flight.departure),
                    (Flight::DESTINATION, &flight.destination),
                ] {
                    if !taken(conn, EntryKind::Airport, "icao", icao, None)? {
                        missing.push(column);
                    }
                }
            }
            Entry::AircraftType(_)
            | Entry::Pilot(_)
            | Entry::Simulator(_)
            | Entry::Currency(_) => {}
        }
        if missing.is_empty() {
            return Ok(());
        }
        Err(LogbookError::ValidationFailed {
            table: entry.table_name(),
            fields: missing.into_iter().map(str::to_string).collect(),
        })
    }

    /// An airport's ICAO code may not change while flights use the old code.
    fn check_icao_rename(&self, id: RowId, new_icao: &str) -> LogbookResult<()> {
        let old: String = self.conn.query_row(AIRPORT_ICAO, params![id], |row| row.get(0))?;
        if old == new_icao {
            return Ok(());
        }
        let referenced_by = ids(&self.conn, FLIGHTS_AT_AIRPORT, params![old])?;
        if referenced_by.is_empty() {
            return Ok(());
        }
        Err(LogbookError::Conflict {
            kind: EntryKind::Airport,
            id,
            referenced_by,
        })
    }
}
