mod common;

use tempfile::TempDir;

use pilotlog::{
    config::LogbookConfig,
    db::{Database, QueryFilter, SchemaState, SeedData},
    entry::{Entry, Pilot},
    error::LogbookError,
    types::{CompletionTarget, EntryKind, LogbookView},
};

use common::{add, date, flight, seed_refs, time};

const SEED: &str = r#"{
    "aircraft_types": [
        {"make": "Airbus", "model": "A320", "variant": "200", "multipilot": 1, "multiengine": 1},
        {"make": "Diamond", "model": "DA42", "multiengine": 1}
    ],
    "airports": [
        {"icao": "EDDF", "iata": "FRA", "name": "Frankfurt", "latitude": 50.0333, "longitude": 8.5706},
        {"icao": "EDDM", "iata": "MUC", "name": "Munich", "latitude": 48.3538, "longitude": 11.7861}
    ]
}"#;

#[test]
fn reopening_a_logbook_keeps_its_data() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("logbook.db");

    {
        let mut db = Database::open(&path, LogbookConfig::default()).expect("open");
        db.initialize_schema(None).expect("schema");
        let refs = seed_refs(&mut db);
        add(&mut db, flight(&refs, date(2024, 6, 1), time(9, 0), time(10, 0)));
        db.initialize_schema(None).expect("second init on same connection");
    }

    let mut db = Database::open(&path, LogbookConfig::default()).expect("reopen");
    assert_eq!(db.state(), SchemaState::Uninitialized);
    db.initialize_schema(None).expect("schema on reopen");
    let summary = db.summary().expect("summary");
    assert_eq!(summary.total_flights, 1);
    assert_eq!(summary.total_pilots, 2);
    assert_eq!(summary.total_time, 60);
}

#[test]
fn seed_fills_empty_reference_tables_once() {
    let seed = SeedData::from_json_str(SEED).expect("seed");
    let mut db = Database::open_in_memory(LogbookConfig::default()).expect("open");
    db.initialize_schema(Some(&seed)).expect("schema");

    let identifiers = db.completions(CompletionTarget::AirportIdentifiers).expect("completions");
    assert_eq!(identifiers, ["EDDF", "EDDM", "FRA", "MUC"]);
    let types = db.completions(CompletionTarget::AircraftTypes).expect("completions");
    assert_eq!(types, ["Airbus A320-200", "Diamond DA42"]);

    db.initialize_schema(Some(&seed)).expect("re-init");
    let names = db.completions(CompletionTarget::AirportNames).expect("names");
    assert_eq!(names, ["Frankfurt", "Munich"]);
}

#[test]
fn incompatible_existing_table_is_a_schema_error() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("foreign.db");
    {
        let conn = rusqlite::Connection::open(&path).expect("sqlite");
        conn.execute_batch("CREATE TABLE pilots (pilot_id INTEGER PRIMARY KEY, nickname TEXT)")
            .expect("create");
    }

    let mut db = Database::open(&path, LogbookConfig::default()).expect("open");
    let err = db.initialize_schema(None).expect_err("incompatible");
    assert!(matches!(err, LogbookError::Schema(_)));
    assert_eq!(db.state(), SchemaState::Uninitialized);
    assert!(matches!(
        db.insert(&Entry::from(Pilot {
            last_name: "Self".into(),
            ..Pilot::default()
        })),
        Err(LogbookError::NotReady)
    ));
}

#[test]
fn malformed_seed_rolls_back_everything() {
    let seed = SeedData::from_json_str(
        r#"{"airports": [
            {"icao": "EDDF", "latitude": 50.0, "longitude": 8.5},
            {"icao": "TOOLONG"}
        ]}"#,
    )
    .expect("json is well formed");

    let mut db = Database::open_in_memory(LogbookConfig::default()).expect("open");
    let err = db.initialize_schema(Some(&seed)).expect_err("invalid seed row");
    assert!(matches!(err, LogbookError::Schema(ref msg) if msg.contains("airports row 1")));
    assert!(!db.is_ready());

    db.initialize_schema(None).expect("schema without seed");
    assert!(db.completions(CompletionTarget::AirportIdentifiers).expect("completions").is_empty());
}

#[test]
fn seed_ids_are_kept() {
    let seed = SeedData::from_json_str(
        r#"{"aircraft_types": [{"aircraft_type_id": 40, "make": "Boeing", "model": "737"}]}"#,
    )
    .expect("seed");
    let mut db = Database::open_in_memory(LogbookConfig::default()).expect("open");
    db.initialize_schema(Some(&seed)).expect("schema");
    assert!(matches!(
        db.get_entry(EntryKind::AircraftType, 40),
        Ok(Entry::AircraftType(t)) if t.model == "737"
    ));
}

#[test]
fn duplicate_registrations_in_an_existing_file_are_a_schema_error() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("duplicates.db");
    {
        let mut db = Database::open(&path, LogbookConfig::default()).expect("open");
        db.initialize_schema(None).expect("schema");
        seed_refs(&mut db);
    }
    {
        let conn = rusqlite::Connection::open(&path).expect("sqlite");
        conn.execute_batch(
            "DROP INDEX idx_tails_registration;
             INSERT INTO tails (registration, aircraft_type_id)
                 SELECT registration, aircraft_type_id FROM tails ORDER BY tail_id LIMIT 1;",
        )
        .expect("duplicate tail");
    }

    let mut db = Database::open(&path, LogbookConfig::default()).expect("reopen");
    let err = db.initialize_schema(None).expect_err("unique index cannot be built");
    assert!(matches!(err, LogbookError::Schema(ref msg) if msg.contains("indexes")), "{err:?}");
    assert!(!db.is_ready());
}

#[test]
fn stale_views_are_rebuilt() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("stale.db");
    {
        let mut db = Database::open(&path, LogbookConfig::default()).expect("open");
        db.initialize_schema(None).expect("schema");
        let refs = seed_refs(&mut db);
        add(&mut db, flight(&refs, date(2024, 6, 1), time(9, 0), time(10, 0)));
    }
    {
        let conn = rusqlite::Connection::open(&path).expect("sqlite");
        conn.execute_batch("DROP VIEW view_default; CREATE VIEW view_default AS SELECT 1 AS stale;")
            .expect("stale view");
    }

    let mut db = Database::open(&path, LogbookConfig::default()).expect("reopen");
    db.initialize_schema(None).expect("views rebuilt");
    let view = db.query(LogbookView::Default, &QueryFilter::all()).expect("query");
    assert_eq!(view.rows.len(), 1);
    assert!(view.column("stale").is_none());
    assert!(view.column("date").is_some());
}

#[test]
fn table_in_place_of_a_view_is_a_schema_error() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("clash.db");
    {
        let conn = rusqlite::Connection::open(&path).expect("sqlite");
        conn.execute_batch("CREATE TABLE view_easa (note TEXT)").expect("create");
    }

    let mut db = Database::open(&path, LogbookConfig::default()).expect("open");
    let err = db.initialize_schema(None).expect_err("name taken by a table");
    assert!(matches!(err, LogbookError::Schema(ref msg) if msg.contains("view_easa")), "{err:?}");
}
