#![allow(dead_code)]

use chrono::NaiveDate;

use pilotlog::{
    config::LogbookConfig,
    db::Database,
    entry::{AircraftType, Airport, Entry, Flight, Pilot, Tail},
    types::{RowId, TimeOfDay},
};

/// Ids of the reference rows every fixture logbook starts with.
pub struct Refs {
    pub pic: RowId,
    pub first_officer: RowId,
    pub a320: RowId,
    pub c172: RowId,
    pub airbus_tail: RowId,
    pub cessna_tail: RowId,
    pub eddf: RowId,
    pub egll: RowId,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

pub fn time(h: u16, m: u16) -> TimeOfDay {
    TimeOfDay::from_hm(h, m).expect("time")
}

pub fn ready_db() -> Database {
    let mut db = Database::open_in_memory(LogbookConfig::default()).expect("open");
    db.initialize_schema(None).expect("schema");
    db
}

pub fn airport(icao: &str, lat: f64, lon: f64) -> Airport {
    Airport {
        icao: icao.to_string(),
        latitude: Some(lat),
        longitude: Some(lon),
        ..Airport::default()
    }
}

pub fn add(db: &mut Database, entry: impl Into<Entry>) -> RowId {
    db.insert(&entry.into()).expect("insert")
}

pub fn seed_refs(db: &mut Database) -> Refs {
    let pic = add(
        db,
        Pilot {
            last_name: "Self".into(),
            ..Pilot::default()
        },
    );
    let first_officer = add(
        db,
        Pilot {
            last_name: "Jensen".into(),
            first_name: Some("Kim".into()),
            company: Some("Lufthansa".into()),
            ..Pilot::default()
        },
    );
    let a320 = add(
        db,
        AircraftType {
            make: "Airbus".into(),
            model: "A320".into(),
            variant: Some("200".into()),
            multi_pilot: true,
            multi_engine: true,
            ..AircraftType::default()
        },
    );
    let c172 = add(
        db,
        AircraftType {
            make: "Cessna".into(),
            model: "172".into(),
            ..AircraftType::default()
        },
    );
    let airbus_tail = add(
        db,
        Tail {
            registration: "D-AIZZ".into(),
            aircraft_type_id: Some(a320),
            company: Some("Lufthansa".into()),
            ..Tail::default()
        },
    );
    let cessna_tail = add(
        db,
        Tail {
            registration: "D-EFGH".into(),
            aircraft_type_id: Some(c172),
            ..Tail::default()
        },
    );
    let eddf = add(db, airport("EDDF", 50.0333, 8.5706));
    let egll = add(db, airport("EGLL", 51.4775, -0.4614));
    Refs {
        pic,
        first_officer,
        a320,
        c172,
        airbus_tail,
        cessna_tail,
        eddf,
        egll,
    }
}

/// Frankfurt to Heathrow on `day`, PIC on the Airbus.
pub fn flight(refs: &Refs, day: NaiveDate, off: TimeOfDay, on: TimeOfDay) -> Flight {
    Flight {
        date: Some(day),
        departure: "EDDF".into(),
        destination: "EGLL".into(),
        off_block: Some(off),
        on_block: Some(on),
        pic: Some(refs.pic),
        second_pilot: Some(refs.first_officer),
        tail: Some(refs.airbus_tail),
        takeoffs_day: 1,
        landings_day: 1,
        ..Flight::default()
    }
}
