mod common;

use pilotlog::{
    db::QueryFilter,
    entry::{Entry, Pilot},
    error::LogbookError,
    runtime::{LogbookEvent, RuntimeConfig, RuntimeError, spawn_logbook},
    types::{CompletionTarget, EntryKind, LogbookView, TimeFrame},
};

use common::{date, flight, ready_db, seed_refs, time};

#[tokio::test]
async fn runtime_applies_commands_in_order_and_emits_events() {
    let mut db = ready_db();
    let refs = seed_refs(&mut db);
    let handle = spawn_logbook(db, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let id = handle
        .insert(flight(&refs, date(2024, 6, 1), time(9, 0), time(10, 0)))
        .await
        .expect("insert");
    let Entry::Flight(mut stored) = handle.get(EntryKind::Flight, id).await.expect("get") else {
        panic!("expected a flight");
    };
    stored.on_block = Some(time(11, 0));
    handle.update(stored).await.expect("update");

    let summary = handle.summary().await.expect("summary");
    assert_eq!(summary.total_flights, 1);
    assert_eq!(summary.total_time, 120);

    let totals = handle
        .totals(TimeFrame::AllTime, date(2024, 6, 15))
        .await
        .expect("totals");
    assert_eq!(totals.flight_time.total, 120);

    let view = handle
        .query(LogbookView::Default, QueryFilter::all())
        .await
        .expect("query");
    assert_eq!(view.rows.len(), 1);
    assert_eq!(handle.flight_records(QueryFilter::all()).await.expect("records").len(), 1);

    handle.remove(EntryKind::Flight, id).await.expect("remove");

    assert_eq!(
        sub.recv().await.expect("event"),
        LogbookEvent::Inserted { kind: EntryKind::Flight, id }
    );
    assert_eq!(
        sub.recv().await.expect("event"),
        LogbookEvent::Updated { kind: EntryKind::Flight, id }
    );
    assert_eq!(
        sub.recv().await.expect("event"),
        LogbookEvent::Removed { kind: EntryKind::Flight, id }
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_commands_surface_logbook_errors_without_events() {
    let mut db = ready_db();
    let refs = seed_refs(&mut db);
    let handle = spawn_logbook(db, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let err = handle
        .remove(EntryKind::AircraftType, refs.a320)
        .await
        .expect_err("type still referenced by a tail");
    assert!(matches!(
        err,
        RuntimeError::Logbook(LogbookError::Conflict { ref referenced_by, .. })
            if referenced_by == &[refs.airbus_tail]
    ));

    let err = handle
        .insert(Pilot::default())
        .await
        .expect_err("invalid pilot");
    assert!(matches!(err, RuntimeError::Logbook(LogbookError::ValidationFailed { .. })));

    let id = handle
        .insert(Pilot {
            last_name: "Moreau".into(),
            ..Pilot::default()
        })
        .await
        .expect("valid pilot");
    assert_eq!(
        sub.recv().await.expect("event"),
        LogbookEvent::Inserted { kind: EntryKind::Pilot, id }
    );

    let names = handle.completions(CompletionTarget::PilotNames).await.expect("names");
    assert!(names.iter().any(|n| n == "Moreau"));
    assert!(handle.currency_states(date(2024, 6, 15)).await.expect("currencies").is_empty());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn commands_after_shutdown_report_a_closed_channel() {
    let handle = spawn_logbook(ready_db(), RuntimeConfig::default());
    let clone = handle.clone();
    handle.shutdown().await.expect("shutdown");

    assert!(matches!(clone.summary().await, Err(RuntimeError::ChannelClosed)));
    assert!(matches!(
        clone.insert(Pilot {
            last_name: "Late".into(),
            ..Pilot::default()
        })
        .await,
        Err(RuntimeError::ChannelClosed)
    ));
}
