//! Retention maintenance driven by archive cycles.

use integration_tests::{fixtures, setup::TestContext};
use supp_core::{CompositeRecord, Error, RetentionPolicy};

const EIGHT_DAYS: i64 = 691_200;
const DAY: i64 = 86_400;

fn seeded(policy: RetentionPolicy) -> TestContext {
    let ctx = TestContext::new(&[], policy);
    ctx.store
        .put(CompositeRecord::from_event(&fixtures::archive_event(fixtures::T0)));
    ctx
}

/// A row is kept while younger than `max_age` relative to the new record.
#[tokio::test]
async fn test_row_within_max_age_remains() {
    let mut ctx = seeded(RetentionPolicy::new(EIGHT_DAYS, DAY));

    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 600_000))
        .await
        .unwrap();

    assert_eq!(
        ctx.store.timestamps(),
        vec![fixtures::T0, fixtures::T0 + 600_000]
    );
}

/// A row older than `max_age` relative to the new record is deleted.
#[tokio::test]
async fn test_row_past_max_age_is_deleted() {
    let mut ctx = seeded(RetentionPolicy::new(EIGHT_DAYS, DAY));

    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 700_000))
        .await
        .unwrap();

    assert_eq!(ctx.store.timestamps(), vec![fixtures::T0 + 700_000]);
}

/// After maintenance at T no row below `T - max_age` remains.
#[tokio::test]
async fn test_no_expired_rows_after_maintenance() {
    let mut ctx = TestContext::new(&[], RetentionPolicy::new(3_600, DAY));
    for offset in (0..7_200).step_by(300) {
        ctx.store
            .put(CompositeRecord::from_event(&fixtures::archive_event(fixtures::T0 + offset)));
    }

    let now = fixtures::T0 + 7_200;
    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(now))
        .await
        .unwrap();

    let timestamps = ctx.store.timestamps();
    assert!(timestamps.iter().all(|ts| *ts >= now - 3_600));
    assert_eq!(timestamps.first(), Some(&(now - 3_600)));
}

/// `max_age <= 0` turns maintenance off entirely.
#[tokio::test]
async fn test_disabled_retention_never_deletes_or_compacts() {
    let mut ctx = seeded(RetentionPolicy::new(0, DAY));

    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 10 * DAY))
        .await
        .unwrap();

    assert_eq!(ctx.store.len(), 2);
    assert_eq!(ctx.store.delete_calls(), 0);
    assert_eq!(ctx.store.compactions(), 0);
}

/// Compaction does not re-run within the interval, failed or not.
#[tokio::test]
async fn test_compaction_spacing() {
    let mut ctx = TestContext::new(&[], RetentionPolicy::new(EIGHT_DAYS, DAY));
    ctx.store.fail_compactions(1);

    let mut ts = fixtures::T0;
    let end = fixtures::T0 + 2 * DAY;
    while ts <= end {
        // Compaction failures are never raised.
        ctx.coordinator
            .on_archive_event(&fixtures::archive_event(ts))
            .await
            .unwrap();
        ts += 3_600;
    }

    // At T0 (fails), T0 + 1 day and T0 + 2 days.
    assert_eq!(ctx.store.compactions(), 3);
}

/// Prune exhaustion is raised after the record was saved.
#[tokio::test]
async fn test_prune_exhaustion_is_raised_after_save() {
    let mut ctx = seeded(RetentionPolicy::new(EIGHT_DAYS, DAY));
    ctx.store.fail_deletes(3);

    let ts = fixtures::T0 + 700_000;
    let err = ctx
        .coordinator
        .on_archive_event(&fixtures::archive_event(ts))
        .await
        .expect_err("prune must fail");

    assert!(matches!(err, Error::PruneFailed { attempts: 3, .. }));
    assert!(ctx.store.row(ts).is_some());
    assert!(ctx.store.row(fixtures::T0).is_some());
    assert_eq!(ctx.store.compactions(), 0);

    // The next cycle prunes normally.
    ctx.coordinator
        .on_archive_event(&fixtures::archive_event(ts + 300))
        .await
        .unwrap();
    assert!(ctx.store.row(fixtures::T0).is_none());
}
