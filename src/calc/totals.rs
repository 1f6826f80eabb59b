use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    entry::{FlightRecord, FlightTimes, SimulatorSession},
    types::TimeFrame,
};

/// Sums over the flights and simulator sessions of one time frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Number of flights counted.
    pub flights: u32,
    /// Per-bucket flight time.
    pub flight_time: FlightTimes,
    /// Day plus night take-offs.
    pub takeoffs: u32,
    /// Day plus night landings.
    pub landings: u32,
    /// Number of simulator sessions counted.
    pub simulator_sessions: u32,
    /// Simulator time, kept apart from flight time.
    pub simulator_time: u32,
}

impl Totals {
    /// Flight and simulator time combined.
    pub fn flight_and_simulator(&self) -> u32 {
        self.flight_time.total.saturating_add(self.simulator_time)
    }
}

/// Totals over everything dated inside `frame` relative to `today`.
///
/// Each record is visited once; undated records are skipped.
pub fn aggregate_totals<'a>(
    flights: impl IntoIterator<Item = &'a FlightRecord>,
    sessions: impl IntoIterator<Item = &'a SimulatorSession>,
    frame: TimeFrame,
    today: NaiveDate,
) -> Totals {
    let in_frame = |date: Option<NaiveDate>| date.is_some_and(|d| frame.contains(d, today));
    let mut totals = Totals::default();

    for record in flights {
        if !in_frame(record.flight.date) {
            continue;
        }
        totals.flights = totals.flights.saturating_add(1);
        totals.flight_time.accumulate(&record.times);
        totals.takeoffs = totals.takeoffs.saturating_add(record.flight.takeoffs());
        totals.landings = totals.landings.saturating_add(record.flight.landings());
    }
    for session in sessions {
        if !in_frame(session.date) {
            continue;
        }
        totals.simulator_sessions = totals.simulator_sessions.saturating_add(1);
        totals.simulator_time = totals.simulator_time.saturating_add(session.duration);
    }
    totals
}
