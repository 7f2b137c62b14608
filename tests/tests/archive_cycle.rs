//! End-to-end archive cycles against the memory store.
//!
//! Sources are represented by their result slots; loop packets and archive
//! events are fed straight into the coordinator, as the binary does.

use std::collections::BTreeSet;
use std::time::Duration;

use integration_tests::{fixtures, setup::TestContext};
use supp_core::{fields, Error, FieldPackage, FieldValue, RetentionPolicy};
use tokio::sync::mpsc;
use worker::{run_intake, ArchiveConfig, IntakeEnd};

/// Worker publishes A then B before any drain: the drain yields exactly B.
#[tokio::test]
async fn test_drain_sees_only_latest_package() {
    let mut ctx = TestContext::without_retention(&["forecast"]);

    let slot = ctx.slot("forecast");
    assert!(!slot.publish(FieldPackage::new("forecast", fixtures::T0).with(fields::FORECAST_TEXT, "A")));
    assert!(slot.publish(FieldPackage::new("forecast", fixtures::T0 + 60).with(fields::FORECAST_TEXT, "B")));

    let record = ctx
        .coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 300))
        .await
        .expect("cycle succeeds");

    assert_eq!(record.get(fields::FORECAST_TEXT), Some(&FieldValue::from("B")));
    assert!(ctx.slot("forecast").is_empty());
    assert_eq!(ctx.store.len(), 1);
}

/// Save fails twice then succeeds on the third of three attempts.
#[tokio::test]
async fn test_save_succeeds_on_last_attempt_without_duplicates() {
    let mut ctx = TestContext::without_retention(&["forecast"]);
    ctx.store.fail_inserts(2);

    let ts = fixtures::T0 + 300;
    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(ts))
        .await
        .expect("third attempt succeeds");

    assert_eq!(ctx.store.insert_calls(), 3);
    assert_eq!(ctx.store.timestamps(), vec![ts]);
}

/// Every save attempt fails: the cycle errors and no row exists.
#[tokio::test]
async fn test_save_exhaustion_is_raised() {
    let mut ctx = TestContext::without_retention(&["forecast"]);
    ctx.store.fail_inserts(3);

    let ts = fixtures::T0 + 300;
    let err = ctx
        .coordinator
        .on_archive_event(&fixtures::archive_event(ts))
        .await
        .expect_err("save must fail");

    match err {
        Error::SaveFailed {
            timestamp,
            attempts,
            ..
        } => {
            assert_eq!(timestamp, ts);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected SaveFailed, got {other:?}"),
    }
    assert!(ctx.store.row(ts).is_none());
    assert_eq!(run_next_cycle(&mut ctx).await, 1);
}

/// The next cycle after a failed save runs normally.
async fn run_next_cycle(ctx: &mut TestContext) -> usize {
    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 600))
        .await
        .expect("store recovered");
    ctx.store.len()
}

/// A record holds exactly the union of drained, stashed and event fields.
#[tokio::test]
async fn test_record_fields_are_exact_union() {
    let mut ctx = TestContext::without_retention(&["forecast", "conditions"]);

    ctx.slot("forecast").publish(
        FieldPackage::new("forecast", fixtures::T0)
            .with(fields::FORECAST_TEXT, "Showers early, then clearing.")
            .with(fields::FORECAST_ICON, 11_i64),
    );
    ctx.slot("conditions").publish(
        FieldPackage::new("conditions", fixtures::T0)
            .with(fields::CURRENT_TEXT, "Light Rain")
            .with(fields::CURRENT_ICON, supp_core::WdIcon::Rain),
    );
    ctx.coordinator.on_loop_packet(&fixtures::loop_packet(fixtures::T0 + 2));

    let record = ctx
        .coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 300))
        .await
        .unwrap();

    let names: BTreeSet<&str> = record.field_names().collect();
    let expected: BTreeSet<&str> = [
        fields::FORECAST_TEXT,
        fields::FORECAST_ICON,
        fields::CURRENT_TEXT,
        fields::CURRENT_ICON,
        fields::VANTAGE_FORECAST_ICON,
        fields::VANTAGE_FORECAST_RULE,
        fields::STORM_RAIN,
        fields::STORM_START,
        fields::MAX_SOLAR_RAD,
    ]
    .into_iter()
    .collect();
    assert_eq!(names, expected);

    assert_eq!(record.timestamp, fixtures::T0 + 300);
    assert_eq!(record.interval, 5);
    assert_eq!(
        record.get(fields::VANTAGE_FORECAST_RULE),
        Some(&FieldValue::from("Mostly clear and cooler."))
    );
    assert_eq!(ctx.store.row(fixtures::T0 + 300), Some(record));
}

/// A source that has not published leaves its fields out, nothing more.
#[tokio::test]
async fn test_missing_source_fields_are_normal() {
    let mut ctx = TestContext::without_retention(&["forecast", "conditions"]);
    ctx.slot("conditions")
        .publish(FieldPackage::new("conditions", fixtures::T0).with(fields::CURRENT_TEXT, "Clear"));

    let record = ctx
        .coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 300))
        .await
        .unwrap();

    assert_eq!(record.field_names().collect::<Vec<_>>(), vec![fields::CURRENT_TEXT]);
}

/// Primary event lines drive the coordinator until the stream closes.
#[tokio::test]
async fn test_primary_event_lines_drive_a_cycle() {
    let mut ctx = TestContext::without_retention(&[]);

    let loop_line = serde_json::json!({
        "event": "loop",
        "packet": { "dateTime": fixtures::T0, "stormRain": 3.0 }
    })
    .to_string();

    let (tx, mut lines) = mpsc::channel(8);
    for line in [
        loop_line,
        "{not json".to_string(),
        String::new(),
        fixtures::archive_line(fixtures::T0 + 300),
    ] {
        tx.send(line).await.unwrap();
    }
    drop(tx);

    let report = run_intake(&mut ctx.coordinator, &mut lines, std::future::pending()).await;

    assert_eq!(report.end, IntakeEnd::StreamClosed);
    assert_eq!(report.loop_packets, 1);
    assert_eq!(report.malformed_lines, 1);
    assert_eq!(report.archive_cycles, 1);
    let row = ctx.store.row(fixtures::T0 + 300).expect("row saved");
    assert_eq!(row.get(fields::STORM_RAIN), Some(&FieldValue::Real(3.0)));
}

/// Shutdown during a failing save waits for the cycle, which fails visibly.
#[tokio::test(start_paused = true)]
async fn test_shutdown_mid_save_finishes_the_cycle() {
    let mut ctx = TestContext::with_config(
        &[],
        ArchiveConfig {
            retention: RetentionPolicy::new(0, 0),
            database_max_tries: 3,
            database_retry_wait: 2,
        },
    );
    ctx.store.fail_inserts(3);

    let (tx, mut lines) = mpsc::channel(8);
    tx.send(fixtures::archive_line(fixtures::T0 + 300)).await.unwrap();
    tx.send(fixtures::archive_line(fixtures::T0 + 600)).await.unwrap();

    // Fires during the first retry wait.
    let shutdown = tokio::time::sleep(Duration::from_millis(500));
    let report = run_intake(&mut ctx.coordinator, &mut lines, shutdown).await;

    assert_eq!(report.end, IntakeEnd::Shutdown);
    assert_eq!(report.failed_cycles, 1);
    assert_eq!(report.archive_cycles, 0);
    assert_eq!(ctx.store.insert_calls(), 3);
    assert!(ctx.store.is_empty());

    // The second event was not started once shutdown was seen.
    assert_eq!(lines.recv().await, Some(fixtures::archive_line(fixtures::T0 + 600)));
}
