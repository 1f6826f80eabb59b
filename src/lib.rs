//! Pilot logbook core: typed entries, flight time calculations and an
//! SQLite-backed database service.
//!
//! # Examples
//!
//! Logging a flight with [`db::Database`]:
//! ```
//! use chrono::NaiveDate;
//! use pilotlog::{
//!     config::LogbookConfig,
//!     db::Database,
//!     entry::{AircraftType, Airport, Entry, Flight, Pilot, Tail},
//!     types::TimeOfDay,
//! };
//!
//! let mut db = Database::open_in_memory(LogbookConfig::default()).expect("open");
//! db.initialize_schema(None).expect("schema");
//!
//! let pic = db
//!     .insert(&Entry::from(Pilot {
//!         last_name: "Self".into(),
//!         ..Pilot::default()
//!     }))
//!     .expect("pilot");
//! let a320 = db
//!     .insert(&Entry::from(AircraftType {
//!         make: "Airbus".into(),
//!         model: "A320".into(),
//!         multi_pilot: true,
//!         multi_engine: true,
//!         ..AircraftType::default()
//!     }))
//!     .expect("type");
//! let tail = db
//!     .insert(&Entry::from(Tail {
//!         registration: "D-AIZZ".into(),
//!         aircraft_type_id: Some(a320),
//!         ..Tail::default()
//!     }))
//!     .expect("tail");
//! for icao in ["EDDF", "EGLL"] {
//!     let airport = Airport {
//!         icao: icao.into(),
//!         ..Airport::default()
//!     };
//!     db.insert(&airport.into()).expect("airport");
//! }
//!
//! db.insert(&Entry::from(Flight {
//!     date: NaiveDate::from_ymd_opt(2024, 6, 1),
//!     departure: "EDDF".into(),
//!     destination: "EGLL".into(),
//!     off_block: TimeOfDay::from_hm(9, 0),
//!     on_block: TimeOfDay::from_hm(10, 30),
//!     pic: Some(pic),
//!     tail: Some(tail),
//!     ..Flight::default()
//! }))
//! .expect("flight");
//!
//! let summary = db.summary().expect("summary");
//! assert_eq!(summary.total_flights, 1);
//! assert_eq!(summary.total_time, 90);
//! ```
//!
//! Serializing writes through the runtime worker:
//! ```no_run
//! use pilotlog::{
//!     config::LogbookConfig,
//!     db::Database,
//!     entry::Pilot,
//!     runtime::{RuntimeConfig, spawn_logbook},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut db = Database::open("logbook.db", LogbookConfig::default()).expect("open");
//! db.initialize_schema(None).expect("schema");
//! let handle = spawn_logbook(db, RuntimeConfig::default());
//! let _id = handle
//!     .insert(Pilot { last_name: "Self".into(), ..Pilot::default() })
//!     .await
//!     .expect("insert");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Completion lists cached per input field.
pub mod cache;
/// Pure flight time, night time and currency calculations.
pub mod calc;
/// Runtime thresholds loaded from TOML.
pub mod config;
/// SQLite database service.
pub mod db;
/// Typed logbook records.
pub mod entry;
/// Crate error type.
pub mod error;
/// Single-writer async worker.
pub mod runtime;
/// Shared identifiers and enums.
pub mod types;
