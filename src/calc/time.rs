use crate::{
    entry::{Airport, Flight, FlightTimes},
    types::{AircraftCategory, FlightRules, MINUTES_PER_DAY, PilotFunction, TimeOfDay},
};

use super::{
    CalcError,
    night::{NightInput, night_time},
};

/// Minutes from `off` to `on`, wrapping once past midnight.
///
/// Equal times are rejected: a flight has a positive duration.
pub fn block_time(off: TimeOfDay, on: TimeOfDay) -> Result<u32, CalcError> {
    let mut minutes = i32::from(on.minutes()) - i32::from(off.minutes());
    if minutes < 0 {
        minutes += i32::from(MINUTES_PER_DAY);
    }
    if minutes <= 0 {
        return Err(CalcError::InvalidTimeRange(format!(
            "on-block {on} is not after off-block {off}"
        )));
    }
    Ok(minutes.unsigned_abs())
}

/// Derives every duration bucket of `flight`.
///
/// `category` is the aircraft category of the tail flown; when unknown no
/// category bucket is filled. Night time is zero unless both airports carry
/// coordinates.
pub fn flight_times(
    flight: &Flight,
    departure: Option<&Airport>,
    destination: Option<&Airport>,
    category: Option<AircraftCategory>,
    night_angle_deg: f64,
) -> Result<FlightTimes, CalcError> {
    let (Some(off), Some(on)) = (flight.off_block, flight.on_block) else {
        return Err(CalcError::InvalidTimeRange("block times are incomplete".to_string()));
    };
    let date = flight
        .date
        .ok_or_else(|| CalcError::InvalidTimeRange("flight has no date".to_string()))?;
    let total = block_time(off, on)?;

    let night = night_time(
        &NightInput {
            departure: departure.and_then(Airport::coordinates),
            destination: destination.and_then(Airport::coordinates),
            date,
            off_block: off,
            block_minutes: total,
        },
        night_angle_deg,
    );

    let mut times = FlightTimes {
        total,
        night,
        ..FlightTimes::default()
    };
    if flight.flight_rules == FlightRules::Ifr {
        times.ifr = total;
    }
    match category {
        Some(AircraftCategory::SinglePilotSingleEngine) => times.spse = total,
        Some(AircraftCategory::SinglePilotMultiEngine) => times.spme = total,
        Some(AircraftCategory::MultiPilot) => times.multi_pilot = total,
        None => {}
    }
    match flight.function {
        PilotFunction::Pic => times.pic = total,
        PilotFunction::Picus => times.picus = total,
        PilotFunction::Sic => times.sic = total,
        PilotFunction::Dual => times.dual = total,
        PilotFunction::Fi => {
            times.instructor = total;
            times.pic = total;
        }
    }
    Ok(times)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn t(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::from_hm(h, m).expect("time")
    }

    #[test]
    fn block_time_crosses_midnight() {
        assert_eq!(block_time(t(23, 50), t(0, 10)), Ok(20));
        assert_eq!(block_time(t(8, 0), t(9, 35)), Ok(95));
        assert_eq!(block_time(t(0, 1), t(0, 0)), Ok(1439));
    }

    #[test]
    fn equal_times_are_rejected() {
        assert!(matches!(
            block_time(t(12, 0), t(12, 0)),
            Err(CalcError::InvalidTimeRange(_))
        ));
    }

    fn flight(function: PilotFunction, rules: FlightRules) -> Flight {
        Flight {
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            departure: "EDDF".into(),
            destination: "EDDM".into(),
            off_block: Some(t(10, 0)),
            on_block: Some(t(11, 0)),
            pic: Some(1),
            tail: Some(1),
            function,
            flight_rules: rules,
            ..Flight::default()
        }
    }

    #[test]
    fn instructor_time_also_counts_as_pic() {
        let times = flight_times(
            &flight(PilotFunction::Fi, FlightRules::Vfr),
            None,
            None,
            Some(AircraftCategory::SinglePilotSingleEngine),
            -6.0,
        )
        .expect("times");
        assert_eq!(times.total, 60);
        assert_eq!(times.instructor, 60);
        assert_eq!(times.pic, 60);
        assert_eq!(times.spse, 60);
        assert_eq!(times.spme + times.multi_pilot + times.ifr + times.night, 0);
    }

    #[test]
    fn ifr_and_category_buckets_follow_total() {
        let times = flight_times(
            &flight(PilotFunction::Sic, FlightRules::Ifr),
            None,
            None,
            Some(AircraftCategory::MultiPilot),
            -6.0,
        )
        .expect("times");
        assert_eq!(times.ifr, 60);
        assert_eq!(times.multi_pilot, 60);
        assert_eq!(times.sic, 60);
        assert_eq!(times.pic, 0);
    }

    #[test]
    fn incomplete_flight_is_an_invalid_range() {
        let mut f = flight(PilotFunction::Pic, FlightRules::Vfr);
        f.on_block = None;
        assert!(flight_times(&f, None, None, None, -6.0).is_err());
    }
}
