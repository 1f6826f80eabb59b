use chrono::NaiveDate;
use proptest::prelude::*;

use pilotlog::{
    calc::{NightInput, night_time},
    entry::Coordinates,
    types::TimeOfDay,
};

fn input(lat: f64, lon: f64, day: u32, off: u16, minutes: u32) -> NightInput {
    let here = Coordinates::new(lat, lon);
    NightInput {
        departure: Some(here),
        destination: Some(here),
        date: NaiveDate::from_yo_opt(2024, day).expect("date"),
        off_block: TimeOfDay::from_minutes(off).expect("off"),
        block_minutes: minutes,
    }
}

proptest! {
    #[test]
    fn night_never_exceeds_block_time(
        lat in -60.0f64..60.0,
        lon in -180.0f64..180.0,
        day in 1u32..=366,
        off in 0u16..1440,
        minutes in 0u32..1200,
        angle in -18.0f64..0.0,
    ) {
        let night = night_time(&input(lat, lon, day, off, minutes), angle);
        prop_assert!(night <= minutes);
    }

    #[test]
    fn deeper_night_angle_counts_fewer_minutes(
        lat in -60.0f64..60.0,
        lon in -180.0f64..180.0,
        day in 1u32..=366,
        off in 0u16..1440,
        minutes in 1u32..1200,
        a in -18.0f64..0.0,
        b in -18.0f64..0.0,
    ) {
        let (shallow, deep) = if a >= b { (a, b) } else { (b, a) };
        let flight = input(lat, lon, day, off, minutes);
        prop_assert!(night_time(&flight, deep) <= night_time(&flight, shallow));
    }

    #[test]
    fn longer_block_at_a_fixed_position_never_loses_night(
        lat in -60.0f64..60.0,
        lon in -180.0f64..180.0,
        day in 1u32..=366,
        off in 0u16..1440,
        minutes in 1u32..1200,
        extra in 0u32..240,
    ) {
        let short = night_time(&input(lat, lon, day, off, minutes), -6.0);
        let long = night_time(&input(lat, lon, day, off, minutes + extra), -6.0);
        prop_assert!(short <= long);
    }

    #[test]
    fn night_between_distinct_airports_stays_within_block_time(
        from in (-60.0f64..60.0, -180.0f64..180.0),
        to in (-60.0f64..60.0, -180.0f64..180.0),
        day in 1u32..=366,
        off in 0u16..1440,
        minutes in 0u32..900,
    ) {
        let flight = NightInput {
            departure: Some(Coordinates::new(from.0, from.1)),
            destination: Some(Coordinates::new(to.0, to.1)),
            ..input(from.0, from.1, day, off, minutes)
        };
        prop_assert!(night_time(&flight, -6.0) <= minutes);
    }
}

#[test]
fn unknown_positions_yield_no_night() {
    let flight = NightInput {
        departure: None,
        ..input(51.5, 0.0, 1, 0, 60)
    };
    assert_eq!(night_time(&flight, -6.0), 0);
}

#[test]
fn midwinter_midnight_in_london_is_all_night() {
    assert_eq!(night_time(&input(51.5, 0.0, 1, 0, 60), -6.0), 60);
}
