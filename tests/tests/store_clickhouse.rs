//! ClickHouse store round trips.
//!
//! Requires Docker for the ClickHouse testcontainer, or an existing server
//! named by `SUPP_TEST_CLICKHOUSE_URL`. Run with `--ignored`.

use std::sync::Arc;

use clickhouse_client::{
    count_records, health::init_schema, latest_timestamp, records_between, truncate_records,
    ArchiveStore, ClickHouseClient, ClickHouseStore,
};
use integration_tests::{containers::TestContainers, fixtures, setup::init_test_tracing};
use supp_core::{fields, CompositeRecord, FieldPackage, FieldValue, RetentionPolicy, WdIcon};
use worker::{ArchiveConfig, ArchiveCoordinator, ResultSlot, SourceSlot};

async fn client(containers: &TestContainers, test: &str) -> ClickHouseClient {
    init_test_tracing();
    let client = ClickHouseClient::new(containers.config_for(test))
        .expect("Failed to create ClickHouse client");
    init_schema(&client)
        .await
        .expect("Failed to initialize schema");
    truncate_records(&client).await.expect("Failed to truncate");
    client
}

fn record(ts: i64) -> CompositeRecord {
    CompositeRecord::from_event(&fixtures::archive_event(ts))
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn test_insert_is_idempotent_per_timestamp() {
    let containers = TestContainers::start().await;
    let store = ClickHouseStore::new(client(&containers, "idempotent").await);

    let mut first = record(fixtures::T0);
    first.merge([(fields::STORM_RAIN.to_string(), FieldValue::Real(1.5))]);
    store.insert(&first).await.unwrap();
    store.insert(&first).await.unwrap();

    assert_eq!(count_records(store.client()).await.unwrap(), 1);
    let rows = records_between(store.client(), fixtures::T0, fixtures::T0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].storm_rain, Some(1.5));
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn test_delete_older_than_and_compact() {
    let containers = TestContainers::start().await;
    let store = ClickHouseStore::new(client(&containers, "prune").await);

    for offset in [0, 300, 600] {
        store.insert(&record(fixtures::T0 + offset)).await.unwrap();
    }

    assert_eq!(store.delete_older_than(fixtures::T0 + 300).await.unwrap(), 1);
    assert_eq!(store.delete_older_than(fixtures::T0 + 300).await.unwrap(), 0);
    store.compact().await.unwrap();

    assert_eq!(count_records(store.client()).await.unwrap(), 2);
    assert_eq!(
        latest_timestamp(store.client()).await.unwrap(),
        Some(fixtures::T0 + 600)
    );
}

/// Whole expired days are dropped; rows of the cutoff's own day are deleted.
#[tokio::test]
#[ignore = "needs Docker"]
async fn test_prune_drops_expired_days() {
    let containers = TestContainers::start().await;
    let store = ClickHouseStore::new(client(&containers, "partitions").await);

    const DAY: i64 = 86_400;
    for ts in [
        fixtures::T0 - 2 * DAY,
        fixtures::T0 - DAY,
        fixtures::T0 - 7_200,
        fixtures::T0,
    ] {
        store.insert(&record(ts)).await.unwrap();
    }

    assert_eq!(store.delete_older_than(fixtures::T0 - 3_600).await.unwrap(), 3);
    assert_eq!(count_records(store.client()).await.unwrap(), 1);
    let rows = records_between(store.client(), fixtures::T0 - 3 * DAY, fixtures::T0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date_time, fixtures::T0);
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn test_coordinator_persists_merged_row() {
    let containers = TestContainers::start().await;
    let client = client(&containers, "coordinator").await;
    let store = Arc::new(ClickHouseStore::new(client.clone()));

    let slot = Arc::new(ResultSlot::new());
    slot.publish(
        FieldPackage::new("conditions", fixtures::T0)
            .with(fields::CURRENT_TEXT, "Light Rain")
            .with(fields::CURRENT_ICON, WdIcon::Rain),
    );
    let config = ArchiveConfig {
        retention: RetentionPolicy::new(691_200, 86_400),
        database_max_tries: 3,
        database_retry_wait: 0,
    };
    let mut coordinator = ArchiveCoordinator::new(
        vec![SourceSlot {
            name: "conditions".to_string(),
            slot,
        }],
        store,
        &config,
    );
    coordinator.on_loop_packet(&fixtures::loop_packet(fixtures::T0));
    coordinator
        .on_archive_event(&fixtures::archive_event(fixtures::T0 + 300))
        .await
        .unwrap();

    let rows = records_between(&client, fixtures::T0, fixtures::T0 + 300).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.date_time, fixtures::T0 + 300);
    assert_eq!(row.current_text.as_deref(), Some("Light Rain"));
    assert_eq!(row.current_icon, Some(i64::from(WdIcon::Rain.code())));
    assert_eq!(
        row.vantage_forecast_rule.as_deref(),
        Some("Mostly clear and cooler.")
    );
    assert_eq!(row.max_solar_rad, Some(820.0));
}
