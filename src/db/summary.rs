//! Aggregates, completions and currency lookups, computed on demand.

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    calc::{
        self, CurrencyState, CurrencyStatus, RecencyEvent, TakeoffLandingCurrency, Totals,
        aggregate_totals,
    },
    entry::{Currency, LogbookEntry, SimulatorSession, pilot::display_name},
    error::LogbookResult,
    types::{CompletionTarget, TimeFrame, TimeOfDay},
};

use super::{Database, QueryFilter, crud::select_rows, derive::lookup_airport};

/// Headline figures of the whole logbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of flights.
    pub total_flights: u32,
    /// Number of pilots.
    pub total_pilots: u32,
    /// Number of tails.
    pub total_tails: u32,
    /// Sum of block times in minutes.
    pub total_time: u32,
    /// Date of the most recent flight.
    pub last_flight: Option<NaiveDate>,
}

impl Database {
    /// Headline figures, recomputed from the current rows.
    ///
    /// Total time is summed from the block times, not from stored derived
    /// columns.
    pub fn summary(&self) -> LogbookResult<Summary> {
        self.ensure_ready()?;
        let count = |table: &str| -> LogbookResult<u32> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(u32::try_from(n).unwrap_or(u32::MAX))
        };

        let mut stmt = self.conn.prepare("SELECT off_block, on_block FROM flights")?;
        let blocks = stmt
            .query_map([], |row| Ok((row.get::<_, u16>(0)?, row.get::<_, u16>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut total_time = 0u32;
        for (off, on) in blocks {
            let (Some(off), Some(on)) = (TimeOfDay::from_minutes(off), TimeOfDay::from_minutes(on))
            else {
                continue;
            };
            total_time = total_time.saturating_add(calc::block_time(off, on)?);
        }

        let last_flight: Option<String> =
            self.conn
                .query_row("SELECT MAX(date) FROM flights", [], |row| row.get(0))?;

        Ok(Summary {
            total_flights: count("flights")?,
            total_pilots: count("pilots")?,
            total_tails: count("tails")?,
            total_time,
            last_flight: last_flight.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        })
    }

    /// Simulator sessions inside `filter`, newest first.
    pub fn simulator_sessions(&self, filter: &QueryFilter) -> LogbookResult<Vec<SimulatorSession>> {
        self.ensure_ready()?;
        let sql = format!(
            "SELECT * FROM simulator_sessions WHERE {} ORDER BY date DESC, session_id DESC",
            QueryFilter::CONDITION
        );
        select_rows(&self.conn, &sql, params_from_iter(filter.params()))?
            .iter()
            .map(SimulatorSession::from_row)
            .collect()
    }

    /// Totals for `frame` relative to `today`, with simulator time kept apart.
    pub fn totals(&self, frame: TimeFrame, today: NaiveDate) -> LogbookResult<Totals> {
        let filter = match frame.window(today) {
            Some((from, to)) => QueryFilter::between(from, to),
            None => QueryFilter::all(),
        };
        let flights = self.flight_records(&filter)?;
        let sessions = self.simulator_sessions(&filter)?;
        Ok(aggregate_totals(&flights, &sessions, frame, today))
    }

    /// Distinct sorted values offered for `target`.
    ///
    /// Served from the completion cache; a target invalidated by a write is
    /// rebuilt here, on first access.
    pub fn completions(&mut self, target: CompletionTarget) -> LogbookResult<Vec<String>> {
        self.ensure_ready()?;
        if let Some(list) = self.cache.get(target) {
            return Ok(list.to_vec());
        }
        let values = self.completion_source(target)?;
        debug!(?target, "completion cache miss");
        Ok(self.cache.store(target, values).to_vec())
    }

    fn completion_source(&self, target: CompletionTarget) -> LogbookResult<Vec<String>> {
        let single = |sql: &str| -> LogbookResult<Vec<String>> {
            let mut stmt = self.conn.prepare(sql)?;
            let values = stmt
                .query_map([], |row| row.get::<_, Option<String>>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(values.into_iter().flatten().collect())
        };
        match target {
            CompletionTarget::AirportIdentifiers => {
                single("SELECT icao FROM airports UNION SELECT iata FROM airports")
            }
            CompletionTarget::AirportNames => single("SELECT name FROM airports"),
            CompletionTarget::Registrations => single("SELECT registration FROM tails"),
            CompletionTarget::Companies => {
                single("SELECT company FROM pilots UNION SELECT company FROM tails")
            }
            CompletionTarget::PilotNames => {
                let mut stmt = self.conn.prepare("SELECT last_name, first_name FROM pilots")?;
                let names = stmt
                    .query_map([], |row| {
                        Ok(display_name(
                            &row.get::<_, String>(0)?,
                            row.get::<_, Option<String>>(1)?.as_deref(),
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(names)
            }
            CompletionTarget::AircraftTypes => single(
                "SELECT CASE WHEN variant IS NULL OR variant = '' THEN make || ' ' || model \
                 ELSE make || ' ' || model || '-' || variant END FROM aircraft_types",
            ),
        }
    }

    /// Every stored currency with its expiry and standing on `today`.
    pub fn currency_states(&self, today: NaiveDate) -> LogbookResult<Vec<CurrencyState>> {
        self.ensure_ready()?;
        let rows = select_rows(
            &self.conn,
            "SELECT * FROM currencies ORDER BY kind, currency_id",
            params![],
        )?;
        rows.iter()
            .map(|row| -> LogbookResult<CurrencyState> {
                let currency = Currency::from_row(row)?;
                let period = self.config.validity.period(currency.kind);
                let expiry = currency
                    .trigger_date
                    .and_then(|d| calc::currency_expiry(d, period));
                let status = expiry.map_or(CurrencyStatus::Expired, |e| {
                    calc::currency_status(e, today, self.config.currency_warning_days)
                });
                Ok(CurrencyState {
                    currency,
                    expiry,
                    status,
                })
            })
            .collect()
    }

    /// Take-off and landing recency as of `today`; later flights are ignored.
    pub fn takeoff_landing_currency(
        &self,
        today: NaiveDate,
    ) -> LogbookResult<TakeoffLandingCurrency> {
        self.ensure_ready()?;
        let mut stmt = self.conn.prepare(
            "SELECT date, takeoffs_day + takeoffs_night, landings_day + landings_night \
             FROM flights WHERE date <= ?1 \
             AND (takeoffs_day + takeoffs_night + landings_day + landings_night) > 0",
        )?;
        let today_text = today.format("%Y-%m-%d").to_string();
        let raw = stmt
            .query_map(params![today_text], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?, row.get::<_, u32>(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let events: Vec<RecencyEvent> = raw
            .into_iter()
            .filter_map(|(date, takeoffs, landings)| {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
                Some(RecencyEvent {
                    date,
                    takeoffs,
                    landings,
                })
            })
            .collect();

        let expiry = calc::takeoff_landing_expiry(&events, self.config.takeoff_landing);
        let status = expiry.map_or(CurrencyStatus::Expired, |e| {
            calc::currency_status(e, today, self.config.currency_warning_days)
        });
        Ok(TakeoffLandingCurrency { expiry, status })
    }

    /// Great circle distance between two stored airports, if both have coordinates.
    pub fn distance_nm(&self, departure: &str, destination: &str) -> LogbookResult<Option<f64>> {
        self.ensure_ready()?;
        let from = lookup_airport(&self.conn, departure)?.and_then(|a| a.coordinates());
        let to = lookup_airport(&self.conn, destination)?.and_then(|a| a.coordinates());
        Ok(from.zip(to).map(|(f, t)| calc::distance_nm(f, t)))
    }
}
