use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use pilotlog::{
    calc::{NightInput, night_time},
    config::LogbookConfig,
    db::Database,
    entry::{AircraftType, Airport, Coordinates, Entry, Flight, Pilot, Tail},
    types::{RowId, TimeFrame, TimeOfDay},
};

struct Refs {
    pic: RowId,
    tail: RowId,
}

fn logbook() -> (Database, Refs) {
    let mut db = Database::open_in_memory(LogbookConfig::default()).expect("open");
    db.initialize_schema(None).expect("schema");
    let pic = db
        .insert(&Entry::from(Pilot {
            last_name: "Self".into(),
            ..Pilot::default()
        }))
        .expect("pilot");
    let kind = db
        .insert(&Entry::from(AircraftType {
            make: "Airbus".into(),
            model: "A320".into(),
            multi_pilot: true,
            multi_engine: true,
            ..AircraftType::default()
        }))
        .expect("type");
    let tail = db
        .insert(&Entry::from(Tail {
            registration: "D-AIZZ".into(),
            aircraft_type_id: Some(kind),
            ..Tail::default()
        }))
        .expect("tail");
    for (icao, lat, lon) in [("EDDF", 50.0333, 8.5706), ("KJFK", 40.6398, -73.7789)] {
        db.insert(&Entry::from(Airport {
            icao: icao.into(),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Airport::default()
        }))
        .expect("airport");
    }
    (db, Refs { pic, tail })
}

fn long_haul(refs: &Refs, i: u32) -> Flight {
    Flight {
        date: NaiveDate::from_ymd_opt(2024, 1, 1)
            .map(|d| d + chrono::Days::new(u64::from(i % 365))),
        departure: "EDDF".into(),
        destination: "KJFK".into(),
        off_block: TimeOfDay::from_minutes((i * 37 % 1440) as u16),
        on_block: TimeOfDay::from_minutes(((i * 37 + 510) % 1440) as u16),
        pic: Some(refs.pic),
        tail: Some(refs.tail),
        takeoffs_day: 1,
        landings_day: 1,
        ..Flight::default()
    }
}

fn bench_inserts(c: &mut Criterion) {
    c.bench_function("insert_long_haul_1k", |b| {
        b.iter(|| {
            let (mut db, refs) = logbook();
            for i in 0..1_000u32 {
                db.insert(&long_haul(&refs, i).into()).expect("insert");
            }
        });
    });
}

fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("reports");
    for n in [100u32, 1_000u32] {
        let (mut db, refs) = logbook();
        for i in 0..n {
            db.insert(&long_haul(&refs, i).into()).expect("insert");
        }
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).expect("date");
        group.bench_with_input(BenchmarkId::new("summary", n), &n, |b, _| {
            b.iter(|| db.summary().expect("summary"));
        });
        group.bench_with_input(BenchmarkId::new("totals_all_time", n), &n, |b, _| {
            b.iter(|| db.totals(TimeFrame::AllTime, today).expect("totals"));
        });
    }
    group.finish();
}

fn bench_night_time(c: &mut Criterion) {
    let input = NightInput {
        departure: Some(Coordinates::new(50.0333, 8.5706)),
        destination: Some(Coordinates::new(40.6398, -73.7789)),
        date: NaiveDate::from_ymd_opt(2024, 12, 21).expect("date"),
        off_block: TimeOfDay::from_hm(16, 0).expect("time"),
        block_minutes: 540,
    };
    c.bench_function("night_time_transatlantic", |b| {
        b.iter(|| night_time(std::hint::black_box(&input), -6.0));
    });
}

criterion_group!(benches, bench_inserts, bench_reports, bench_night_time);
criterion_main!(benches);
