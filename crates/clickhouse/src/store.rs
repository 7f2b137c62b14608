//! Archive store: the persistence seam used by the coordinator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clickhouse::Row;
use serde::{Deserialize, Serialize};
use supp_core::{fields, CompositeRecord, Error, FieldValue, Result};
use tracing::{debug, info};

use crate::client::ClickHouseClient;

/// Time-keyed, append-only record store.
///
/// Single attempts only; retry policy belongs to the caller.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Writes the record. Writing the same timestamp again must not produce
    /// a second row.
    async fn insert(&self, record: &CompositeRecord) -> Result<()>;

    /// Deletes rows with `date_time < cutoff` and returns how many went.
    async fn delete_older_than(&self, cutoff: i64) -> Result<u64>;

    /// Reclaims space left by deleted rows.
    async fn compact(&self) -> Result<()>;
}

/// Flattened archive row.
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub struct SuppRow {
    pub date_time: i64,
    pub us_units: u8,
    pub interval: u32,
    pub forecast_icon: Option<i64>,
    pub forecast_text: Option<String>,
    pub current_icon: Option<i64>,
    pub current_text: Option<String>,
    pub vantage_forecast_icon: Option<i64>,
    pub vantage_forecast_rule: Option<String>,
    pub storm_rain: Option<f64>,
    pub storm_start: Option<i64>,
    pub max_solar_rad: Option<f64>,
}

/// Columns in row order, for SELECTs.
pub const COLUMNS: &str = "date_time, us_units, interval, forecast_icon, forecast_text, \
    current_icon, current_text, vantage_forecast_icon, vantage_forecast_rule, storm_rain, \
    storm_start, max_solar_rad";

impl From<&CompositeRecord> for SuppRow {
    fn from(record: &CompositeRecord) -> Self {
        let int = |name| record.get(name).and_then(FieldValue::as_i64);
        let real = |name| record.get(name).and_then(FieldValue::as_f64);
        let text = |name| {
            record
                .get(name)
                .and_then(FieldValue::as_text)
                .map(str::to_string)
        };

        Self {
            date_time: record.timestamp,
            us_units: record.unit_system.code(),
            interval: record.interval,
            forecast_icon: int(fields::FORECAST_ICON),
            forecast_text: text(fields::FORECAST_TEXT),
            current_icon: int(fields::CURRENT_ICON),
            current_text: text(fields::CURRENT_TEXT),
            vantage_forecast_icon: int(fields::VANTAGE_FORECAST_ICON),
            vantage_forecast_rule: text(fields::VANTAGE_FORECAST_RULE),
            storm_rain: real(fields::STORM_RAIN),
            storm_start: int(fields::STORM_START),
            max_solar_rad: real(fields::MAX_SOLAR_RAD),
        }
    }
}

/// [`ArchiveStore`] backed by a ClickHouse table.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: ClickHouseClient,
    table: String,
}

impl ClickHouseStore {
    pub fn new(client: ClickHouseClient) -> Self {
        let table = client.table();
        Self { client, table }
    }

    pub fn client(&self) -> &ClickHouseClient {
        &self.client
    }

    async fn count_older_than(&self, cutoff: i64) -> Result<u64> {
        self.client
            .inner()
            .query(&format!("SELECT count() FROM {} FINAL WHERE date_time < ?", self.table))
            .bind(cutoff)
            .fetch_one()
            .await
            .map_err(|e| Error::store(format!("Query error: {}", e)))
    }

    /// Drops every partition wholly before `partition` and returns the
    /// number of stored rows they held, duplicates included.
    async fn drop_partitions_before(&self, partition: &str) -> Result<u64> {
        let config = self.client.config();
        let partitions: Vec<ExpiredPartition> = self
            .client
            .inner()
            .query(
                "SELECT partition_id, sum(rows) AS total_rows FROM system.parts \
                 WHERE database = ? AND table = ? AND active = 1 AND partition_id < ? \
                 GROUP BY partition_id ORDER BY partition_id",
            )
            .bind(config.database.as_str())
            .bind(config.table.as_str())
            .bind(partition)
            .fetch_all()
            .await
            .map_err(|e| Error::store(format!("Partition query error: {}", e)))?;

        let mut dropped = 0;
        for expired in partitions {
            self.client
                .inner()
                .query(&format!(
                    "ALTER TABLE {} DROP PARTITION ID '{}'",
                    self.table, expired.partition_id
                ))
                .execute()
                .await
                .map_err(|e| Error::store(format!("Drop partition error: {}", e)))?;

            info!(
                table = %self.table,
                partition = %expired.partition_id,
                rows = expired.total_rows,
                "Dropped expired partition"
            );
            dropped += expired.total_rows;
        }
        Ok(dropped)
    }
}

#[derive(Debug, Row, Deserialize)]
struct ExpiredPartition {
    partition_id: String,
    total_rows: u64,
}

/// Partition id of the UTC day holding `cutoff`. Every partition with a
/// smaller id lies wholly before the cutoff.
///
/// Tables created without the day partitioning have the single id `all`,
/// which never sorts below a date, so they fall back to row deletes.
pub fn cutoff_partition(cutoff: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(cutoff, 0).map(|day| day.format("%Y%m%d").to_string())
}

#[async_trait]
impl ArchiveStore for ClickHouseStore {
    async fn insert(&self, record: &CompositeRecord) -> Result<()> {
        let row = SuppRow::from(record);

        let mut insert = self
            .client
            .inner()
            .insert(&self.table)
            .map_err(|e| Error::store(format!("Insert error: {}", e)))?;

        insert
            .write(&row)
            .await
            .map_err(|e| Error::store(format!("Write error: {}", e)))?;

        insert
            .end()
            .await
            .map_err(|e| Error::store(format!("End error: {}", e)))?;

        debug!(date_time = row.date_time, "Inserted archive row");
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64> {
        let expired = self.count_older_than(cutoff).await?;
        if expired == 0 {
            return Ok(0);
        }

        let dropped = match cutoff_partition(cutoff) {
            Some(partition) => self.drop_partitions_before(&partition).await?,
            None => 0,
        };

        // Rows of the cutoff day itself; a lightweight delete only masks them.
        if self.count_older_than(cutoff).await? > 0 {
            self.client
                .inner()
                .query(&format!("DELETE FROM {} WHERE date_time < ?", self.table))
                .bind(cutoff)
                .execute()
                .await
                .map_err(|e| Error::store(format!("Delete error: {}", e)))?;
        }

        debug!(cutoff, expired, dropped, "Pruned archive rows");
        Ok(expired)
    }

    async fn compact(&self) -> Result<()> {
        self.client
            .inner()
            .query(&format!("OPTIMIZE TABLE {} FINAL", self.table))
            .execute()
            .await
            .map_err(|e| Error::store(format!("Optimize error: {}", e)))?;
        Ok(())
    }
}
