//! Looks up what the calculation engine needs to derive a flight's durations.

use hashbrown::HashMap;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    calc::flight_times,
    entry::{Airport, Flight, FlightTimes, LogbookEntry, aircraft::category_from_flags},
    error::LogbookResult,
    types::{AircraftCategory, EntryKind, RowId},
};

use super::read_row;

/// Memoizing lookup of airports by ICAO code and aircraft categories by tail.
pub(super) struct TimeDeriver<'c> {
    conn: &'c Connection,
    night_angle_deg: f64,
    airports: HashMap<String, Option<Airport>>,
    categories: HashMap<RowId, Option<AircraftCategory>>,
}

impl<'c> TimeDeriver<'c> {
    pub(super) fn new(conn: &'c Connection, night_angle_deg: f64) -> Self {
        Self {
            conn,
            night_angle_deg,
            airports: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Durations of `flight` from its block times, airports and tail.
    pub(super) fn times(&mut self, flight: &Flight) -> LogbookResult<FlightTimes> {
        let departure = self.airport(&flight.departure)?;
        let destination = self.airport(&flight.destination)?;
        let category = match flight.tail {
            Some(tail) => self.category(tail)?,
            None => None,
        };
        Ok(flight_times(
            flight,
            departure.as_ref(),
            destination.as_ref(),
            category,
            self.night_angle_deg,
        )?)
    }

    pub(super) fn airport(&mut self, icao: &str) -> LogbookResult<Option<Airport>> {
        if let Some(cached) = self.airports.get(icao) {
            return Ok(cached.clone());
        }
        let found = lookup_airport(self.conn, icao)?;
        self.airports.insert(icao.to_string(), found.clone());
        Ok(found)
    }

    fn category(&mut self, tail: RowId) -> LogbookResult<Option<AircraftCategory>> {
        if let Some(cached) = self.categories.get(&tail) {
            return Ok(*cached);
        }
        let found = self
            .conn
            .query_row(
                "SELECT a.multipilot, a.multiengine FROM tails t \
                 JOIN aircraft_types a ON a.aircraft_type_id = t.aircraft_type_id \
                 WHERE t.tail_id = ?1",
                params![tail],
                |row| Ok((row.get::<_, bool>(0)?, row.get::<_, bool>(1)?)),
            )
            .optional()?
            .map(|(mp, me)| category_from_flags(mp, me));
        self.categories.insert(tail, found);
        Ok(found)
    }
}

/// Airport with ICAO code `icao`, if stored.
pub(super) fn lookup_airport(conn: &Connection, icao: &str) -> LogbookResult<Option<Airport>> {
    let kind = EntryKind::Airport;
    let sql = format!("SELECT * FROM {} WHERE icao = ?1", kind.table_name());
    let mut stmt = conn.prepare_cached(&sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
    let row = stmt
        .query_row(params![icao], |row| read_row(row, &names))
        .optional()?;
    row.map(|r| Airport::from_row(&r)).transpose()
}
