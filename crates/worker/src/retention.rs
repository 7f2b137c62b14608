//! Age-based pruning and periodic compaction of the archive.

use std::time::Instant;

use clickhouse_client::ArchiveStore;
use supp_core::{Error, Result, RetentionPolicy};
use telemetry::metrics;
use tracing::{debug, error, info};

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionOutcome {
    NotDue,
    Completed,
    /// Logged, never propagated.
    Failed,
}

/// What one maintenance pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// `None` when retention is disabled.
    pub rows_pruned: Option<u64>,
    pub compaction: CompactionOutcome,
}

/// Runs retention maintenance after each saved record.
#[derive(Debug, Clone)]
pub struct RetentionManager {
    policy: RetentionPolicy,
    retry: RetryPolicy,
}

impl RetentionManager {
    pub fn new(policy: RetentionPolicy, retry: RetryPolicy) -> Self {
        Self { policy, retry }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Prunes rows older than `reference_ts - max_age`, then compacts if due.
    ///
    /// A prune that exhausts its retries returns [`Error::PruneFailed`] and
    /// skips compaction for this pass.
    pub async fn run(
        &mut self,
        store: &dyn ArchiveStore,
        reference_ts: i64,
    ) -> Result<MaintenanceReport> {
        if !self.policy.is_enabled() {
            return Ok(MaintenanceReport {
                rows_pruned: None,
                compaction: CompactionOutcome::NotDue,
            });
        }

        let cutoff = self.policy.cutoff(reference_ts);
        let pruned = self
            .retry
            .run("prune", || store.delete_older_than(cutoff))
            .await
            .map_err(|exhausted| {
                metrics().prune_failures.inc();
                Error::PruneFailed {
                    cutoff,
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error.to_string(),
                }
            })?;

        metrics().rows_pruned.inc_by(pruned);
        if pruned > 0 {
            info!(cutoff = cutoff, rows = pruned, "Pruned expired archive rows");
        }

        let compaction = self.compact_if_due(store, reference_ts).await;

        Ok(MaintenanceReport {
            rows_pruned: Some(pruned),
            compaction,
        })
    }

    async fn compact_if_due(
        &mut self,
        store: &dyn ArchiveStore,
        reference_ts: i64,
    ) -> CompactionOutcome {
        if !self.policy.compaction_due(reference_ts) {
            return CompactionOutcome::NotDue;
        }

        let start = Instant::now();
        let result = store.compact().await;
        // Recorded on failure too, so a broken compaction waits a full interval.
        self.policy.record_compaction(reference_ts);

        match result {
            Ok(()) => {
                metrics().compactions.inc();
                debug!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Archive compaction finished"
                );
                CompactionOutcome::Completed
            }
            Err(e) => {
                metrics().compaction_failures.inc();
                error!(error = %e, "Archive compaction failed");
                CompactionOutcome::Failed
            }
        }
    }
}
