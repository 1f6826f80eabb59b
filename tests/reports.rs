mod common;

use pilotlog::{
    calc::CurrencyStatus,
    db::{Database, QueryFilter},
    entry::{Currency, Flight, SimulatorSession, Tail, Value},
    types::{CompletionTarget, CurrencyKind, LogbookView, SimulatorDevice, TimeFrame},
};

use common::{Refs, add, date, flight, ready_db, seed_refs, time};

/// Two June 2024 flights, a night flight across New Year's Eve and a June
/// simulator session.
fn populated() -> (Database, Refs) {
    let mut db = ready_db();
    let refs = seed_refs(&mut db);
    add(&mut db, flight(&refs, date(2024, 6, 1), time(9, 0), time(10, 0)));
    add(&mut db, flight(&refs, date(2024, 6, 10), time(9, 0), time(10, 30)));
    add(&mut db, flight(&refs, date(2023, 12, 31), time(23, 45), time(0, 15)));
    add(
        &mut db,
        SimulatorSession {
            date: Some(date(2024, 6, 5)),
            device: SimulatorDevice::Fstd,
            duration: 120,
            aircraft_type: Some("A320".into()),
            ..SimulatorSession::default()
        },
    );
    (db, refs)
}

fn texts(values: Vec<&Value>) -> Vec<Option<&str>> {
    values.into_iter().map(Value::as_str).collect()
}

#[test]
fn summary_sums_block_times() {
    let (db, _) = populated();
    let summary = db.summary().expect("summary");
    assert_eq!(summary.total_flights, 3);
    assert_eq!(summary.total_pilots, 2);
    assert_eq!(summary.total_tails, 2);
    assert_eq!(summary.total_time, 60 + 90 + 30);
    assert_eq!(summary.last_flight, Some(date(2024, 6, 10)));
}

#[test]
fn empty_logbook_summary_is_zero() {
    let db = ready_db();
    let summary = db.summary().expect("summary");
    assert_eq!(summary.total_flights, 0);
    assert_eq!(summary.total_time, 0);
    assert_eq!(summary.last_flight, None);
}

#[test]
fn totals_respect_time_frames() {
    let (db, _) = populated();
    let today = date(2024, 6, 15);

    let all = db.totals(TimeFrame::AllTime, today).expect("all time");
    assert_eq!(all.flights, 3);
    assert_eq!(all.flight_time.total, 180);
    assert_eq!(all.flight_time.multi_pilot, 180);
    assert_eq!(all.flight_time.night, 30);
    assert_eq!(all.takeoffs, 3);
    assert_eq!(all.simulator_sessions, 1);
    assert_eq!(all.simulator_time, 120);
    assert_eq!(all.flight_and_simulator(), 300);

    let year = db.totals(TimeFrame::CalendarYear, today).expect("year");
    assert_eq!(year.flights, 2);
    assert_eq!(year.flight_time.total, 150);
    assert_eq!(year.flight_time.night, 0);

    let recent = db.totals(TimeFrame::Rolling28Days, today).expect("28 days");
    assert_eq!(recent.flights, 2);
    assert_eq!(recent.simulator_time, 120);

    let rolling = db.totals(TimeFrame::Rolling12Months, today).expect("12 months");
    assert_eq!(rolling.flights, 3);
    assert_eq!(rolling.flight_time.night, 30);

    // 2024 is a leap year, so 365 days back from its last day is New Year's Day.
    let year_end = db
        .totals(TimeFrame::Rolling12Months, date(2024, 12, 31))
        .expect("12 months at year end");
    assert_eq!(year_end.flights, 2);
    assert_eq!(year_end.flight_time.total, 150);
    assert_eq!(year_end.simulator_time, 120);
    let day_before = db
        .totals(TimeFrame::Rolling12Months, date(2024, 12, 30))
        .expect("12 months a day earlier");
    assert_eq!(day_before.flights, 3);
}

#[test]
fn views_list_newest_first_within_the_filter() {
    let (db, _) = populated();

    let flights = db.query(LogbookView::Default, &QueryFilter::year(2024)).expect("default");
    assert_eq!(
        texts(flights.column("date").expect("date")),
        [Some("2024-06-10"), Some("2024-06-01")]
    );
    assert_eq!(
        texts(flights.column("off_block").expect("off_block")),
        [Some("09:00"), Some("09:00")]
    );
    assert_eq!(
        texts(flights.column("aircraft_type").expect("type")),
        [Some("Airbus A320-200"), Some("Airbus A320-200")]
    );

    let mixed = db
        .query(LogbookView::DefaultWithSimulator, &QueryFilter::year(2024))
        .expect("with simulator");
    assert_eq!(
        texts(mixed.column("date").expect("date")),
        [Some("2024-06-10"), Some("2024-06-05"), Some("2024-06-01")]
    );
    let sim_time = mixed.column("sim_time").expect("sim_time");
    assert_eq!(sim_time, [&Value::Null, &Value::Integer(120), &Value::Null]);

    let everything = db.query(LogbookView::EasaWithSimulator, &QueryFilter::all()).expect("easa");
    assert_eq!(everything.rows.len(), 4);
    assert!(everything.column_index("night_time").is_some());

    let sims = db.query(LogbookView::SimulatorOnly, &QueryFilter::all()).expect("sims");
    assert_eq!(sims.rows.len(), 1);
    assert_eq!(texts(sims.column("device").expect("device")), [Some("FSTD")]);
}

#[test]
fn completions_are_rebuilt_only_after_relevant_writes() {
    let (mut db, refs) = populated();
    let before = db.cache().rebuild_count();

    let regs = db.completions(CompletionTarget::Registrations).expect("registrations");
    assert_eq!(regs, ["D-AIZZ", "D-EFGH"]);
    db.completions(CompletionTarget::Registrations).expect("cached");
    assert_eq!(db.cache().rebuild_count(), before + 1);

    add(&mut db, flight(&refs, date(2024, 6, 12), time(9, 0), time(10, 0)));
    assert!(db.cache().is_cached(CompletionTarget::Registrations));

    add(
        &mut db,
        Tail {
            registration: "D-ABCD".into(),
            aircraft_type_id: Some(refs.a320),
            ..Tail::default()
        },
    );
    assert!(!db.cache().is_cached(CompletionTarget::Registrations));
    let regs = db.completions(CompletionTarget::Registrations).expect("rebuilt");
    assert_eq!(regs, ["D-ABCD", "D-AIZZ", "D-EFGH"]);
    assert_eq!(db.cache().rebuild_count(), before + 2);

    assert_eq!(db.completions(CompletionTarget::Companies).expect("companies"), ["Lufthansa"]);
    assert_eq!(
        db.completions(CompletionTarget::PilotNames).expect("pilots"),
        ["Jensen, Kim", "Self"]
    );
}

#[test]
fn currency_states_use_configured_validity() {
    let mut db = ready_db();
    add(&mut db, Currency::new(CurrencyKind::Medical, date(2023, 7, 1)));
    add(&mut db, Currency::new(CurrencyKind::Licence, date(2019, 1, 1)));
    add(&mut db, Currency::new(CurrencyKind::TypeRating, date(2024, 1, 10)));

    let states = db.currency_states(date(2024, 6, 15)).expect("states");
    let summary: Vec<_> = states
        .iter()
        .map(|s| (s.currency.kind, s.expiry, s.status))
        .collect();
    assert_eq!(
        summary,
        [
            (CurrencyKind::Licence, Some(date(2024, 1, 1)), CurrencyStatus::Expired),
            (CurrencyKind::TypeRating, Some(date(2025, 1, 10)), CurrencyStatus::Current),
            (CurrencyKind::Medical, Some(date(2024, 7, 1)), CurrencyStatus::ExpiringSoon),
        ]
    );
}

#[test]
fn takeoff_landing_recency_ignores_future_flights() {
    let (mut db, refs) = populated();
    let today = date(2024, 6, 15);
    add(
        &mut db,
        Flight {
            takeoffs_day: 5,
            landings_day: 5,
            ..flight(&refs, date(2024, 6, 20), time(9, 0), time(10, 0))
        },
    );

    let recency = db.takeoff_landing_currency(today).expect("recency");
    assert_eq!(recency.expiry, Some(date(2024, 3, 30)));
    assert_eq!(recency.status, CurrencyStatus::Expired);

    add(&mut db, flight(&refs, date(2024, 6, 12), time(9, 0), time(10, 0)));
    let recency = db.takeoff_landing_currency(today).expect("recency");
    assert_eq!(recency.expiry, Some(date(2024, 8, 30)));
    assert_eq!(recency.status, CurrencyStatus::Current);
}

#[test]
fn distance_needs_both_airports() {
    let (db, _) = populated();
    let nm = db.distance_nm("EDDF", "EGLL").expect("distance").expect("coordinates");
    assert!((340.0..370.0).contains(&nm), "{nm}");
    assert_eq!(db.distance_nm("EDDF", "KJFK").expect("distance"), None);
}

#[test]
fn simulator_sessions_are_filtered_by_date() {
    let (db, _) = populated();
    assert_eq!(db.simulator_sessions(&QueryFilter::all()).expect("all").len(), 1);
    assert!(
        db.simulator_sessions(&QueryFilter::year(2023))
            .expect("2023")
            .is_empty()
    );
}
