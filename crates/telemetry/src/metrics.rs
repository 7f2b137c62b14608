//! In-process metrics.
//!
//! Workers, the coordinator and the store bump these atomics; the binary
//! logs a snapshot at shutdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic event count.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.inc_by(1);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Level that rises and falls, floored at zero.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }
}

/// Running latency summary in milliseconds.
///
/// One provider call per source per interval and one save per archive
/// period keep the sample count small, so mean and worst case are enough.
#[derive(Debug, Default)]
pub struct Latency {
    total_ms: AtomicU64,
    samples: AtomicU64,
    worst_ms: AtomicU64,
}

impl Latency {
    pub fn observe(&self, ms: u64) {
        self.total_ms.fetch_add(ms, Ordering::Relaxed);
        self.samples.fetch_add(1, Ordering::Relaxed);
        self.worst_ms.fetch_max(ms, Ordering::Relaxed);
    }

    pub fn samples(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }

    pub fn worst_ms(&self) -> u64 {
        self.worst_ms.load(Ordering::Relaxed)
    }

    pub fn mean_ms(&self) -> f64 {
        match self.samples() {
            0 => 0.0,
            n => self.total_ms.load(Ordering::Relaxed) as f64 / n as f64,
        }
    }
}

/// Collected metrics for the archiver.
#[derive(Debug, Default)]
pub struct Metrics {
    // Source polling
    pub source_polls: Counter,
    pub polls_skipped: Counter,
    pub fetch_failures: Counter,
    pub parse_failures: Counter,

    // Result slots
    pub packages_published: Counter,
    pub packages_superseded: Counter,
    pub packages_drained: Counter,

    // Primary pipeline
    pub loop_packets: Counter,
    pub archive_events: Counter,

    // Persistence
    pub records_saved: Counter,
    pub save_retries: Counter,
    pub save_failures: Counter,
    pub rows_pruned: Counter,
    pub prune_failures: Counter,
    pub compactions: Counter,
    pub compaction_failures: Counter,

    // Latency
    pub fetch_latency_ms: Latency,
    pub save_latency_ms: Latency,

    // Gauges
    pub active_workers: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub source_polls: u64,
    pub polls_skipped: u64,
    pub fetch_failures: u64,
    pub parse_failures: u64,
    pub packages_published: u64,
    pub packages_superseded: u64,
    pub packages_drained: u64,
    pub loop_packets: u64,
    pub archive_events: u64,
    pub records_saved: u64,
    pub save_retries: u64,
    pub save_failures: u64,
    pub rows_pruned: u64,
    pub prune_failures: u64,
    pub compactions: u64,
    pub compaction_failures: u64,
    pub fetch_latency_mean_ms: f64,
    pub fetch_latency_worst_ms: u64,
    pub save_latency_mean_ms: f64,
    pub save_latency_worst_ms: u64,
    pub active_workers: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            source_polls: self.source_polls.get(),
            polls_skipped: self.polls_skipped.get(),
            fetch_failures: self.fetch_failures.get(),
            parse_failures: self.parse_failures.get(),
            packages_published: self.packages_published.get(),
            packages_superseded: self.packages_superseded.get(),
            packages_drained: self.packages_drained.get(),
            loop_packets: self.loop_packets.get(),
            archive_events: self.archive_events.get(),
            records_saved: self.records_saved.get(),
            save_retries: self.save_retries.get(),
            save_failures: self.save_failures.get(),
            rows_pruned: self.rows_pruned.get(),
            prune_failures: self.prune_failures.get(),
            compactions: self.compactions.get(),
            compaction_failures: self.compaction_failures.get(),
            fetch_latency_mean_ms: self.fetch_latency_ms.mean_ms(),
            fetch_latency_worst_ms: self.fetch_latency_ms.worst_ms(),
            save_latency_mean_ms: self.save_latency_ms.mean_ms(),
            save_latency_worst_ms: self.save_latency_ms.worst_ms(),
            active_workers: self.active_workers.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
