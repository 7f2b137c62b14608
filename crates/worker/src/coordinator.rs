//! Per-archive-period merge and persistence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clickhouse_client::ArchiveStore;
use serde::{Deserialize, Serialize};
use supp_core::{ArchiveEvent, CompositeRecord, Error, LoopPacket, Result, RetentionPolicy};
use telemetry::metrics;
use tracing::{debug, error, info};

use crate::channel::SourceSlot;
use crate::retention::{MaintenanceReport, RetentionManager};
use crate::retry::RetryPolicy;
use crate::stash::Stash;

/// The `[archive]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(flatten)]
    pub retention: RetentionPolicy,
    #[serde(default = "default_max_tries")]
    pub database_max_tries: u32,
    /// Seconds between storage attempts.
    #[serde(default = "default_retry_wait")]
    pub database_retry_wait: u64,
}

fn default_max_tries() -> u32 {
    3
}

fn default_retry_wait() -> u64 {
    2
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::default(),
            database_max_tries: default_max_tries(),
            database_retry_wait: default_retry_wait(),
        }
    }
}

impl ArchiveConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.database_max_tries,
            Duration::from_secs(self.database_retry_wait),
        )
    }
}

/// Merges source packages, stashed loop data and the archive event into
/// one record per period and persists it.
///
/// Runs on the primary pipeline's task; never waits on a source.
pub struct ArchiveCoordinator {
    slots: Vec<SourceSlot>,
    stash: Stash,
    store: Arc<dyn ArchiveStore>,
    save_retry: RetryPolicy,
    retention: RetentionManager,
}

impl ArchiveCoordinator {
    pub fn new(slots: Vec<SourceSlot>, store: Arc<dyn ArchiveStore>, config: &ArchiveConfig) -> Self {
        let retry = config.retry_policy();
        info!(
            sources = slots.len(),
            max_age = config.retention.max_age_secs,
            vacuum = config.retention.compaction_interval_secs,
            max_tries = retry.max_tries,
            "Archive coordinator ready"
        );
        Self {
            slots,
            stash: Stash::new(),
            store,
            save_retry: retry,
            retention: RetentionManager::new(config.retention.clone(), retry),
        }
    }

    pub fn stash(&self) -> &Stash {
        &self.stash
    }

    pub fn retention(&self) -> &RetentionManager {
        &self.retention
    }

    pub fn on_loop_packet(&mut self, packet: &LoopPacket) {
        metrics().loop_packets.inc();
        self.stash.update(packet);
    }

    /// Drains every slot and merges: sources in order, then the stash, then
    /// the event. Later writes win.
    pub fn build_record(&mut self, event: &ArchiveEvent) -> CompositeRecord {
        let mut record = CompositeRecord::from_event(event);

        for source in &self.slots {
            if let Some(package) = source.slot.take() {
                metrics().packages_drained.inc();
                debug!(
                    source = %source.name,
                    fetched_at = package.fetched_at,
                    fields = package.len(),
                    "Merging source package"
                );
                record.merge(package.fields);
            }
        }

        record.merge(self.stash.fields());

        record.timestamp = event.date_time;
        record.unit_system = event.us_units;
        record.interval = event.interval;
        record
    }

    /// Builds, saves and maintains one archive period.
    ///
    /// An exhausted save returns [`Error::SaveFailed`] and skips retention;
    /// an exhausted prune returns [`Error::PruneFailed`] after the record is
    /// stored.
    pub async fn on_archive_event(&mut self, event: &ArchiveEvent) -> Result<CompositeRecord> {
        metrics().archive_events.inc();
        let record = self.build_record(event);

        self.save(&record).await?;

        let report = self.retention.run(self.store.as_ref(), record.timestamp).await?;
        log_maintenance(record.timestamp, &report);

        Ok(record)
    }

    async fn save(&self, record: &CompositeRecord) -> Result<()> {
        let start = Instant::now();
        let mut attempts = 0u32;
        let store = self.store.as_ref();

        let result = self
            .save_retry
            .run("save", || {
                attempts += 1;
                store.insert(record)
            })
            .await;
        metrics()
            .save_retries
            .inc_by(u64::from(attempts.saturating_sub(1)));

        match result {
            Ok(()) => {
                metrics().records_saved.inc();
                metrics()
                    .save_latency_ms
                    .observe(start.elapsed().as_millis() as u64);
                debug!(
                    timestamp = record.timestamp,
                    fields = record.fields.len(),
                    "Saved archive record"
                );
                Ok(())
            }
            Err(exhausted) => {
                metrics().save_failures.inc();
                error!(
                    timestamp = record.timestamp,
                    attempts = exhausted.attempts,
                    "Archive record not saved"
                );
                Err(Error::SaveFailed {
                    timestamp: record.timestamp,
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error.to_string(),
                })
            }
        }
    }
}

fn log_maintenance(timestamp: i64, report: &MaintenanceReport) {
    debug!(
        timestamp = timestamp,
        rows_pruned = ?report.rows_pruned,
        compaction = ?report.compaction,
        "Retention maintenance done"
    );
}
