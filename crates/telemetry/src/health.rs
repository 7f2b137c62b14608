//! Component health flags.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Health status for the archiver as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Up/down flag with the reason for the last failure.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    healthy: AtomicBool,
    message: RwLock<Option<String>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            healthy: AtomicBool::new(false),
            message: RwLock::new(None),
        }
    }

    pub fn set_healthy(&self) {
        self.healthy.store(true, Ordering::Relaxed);
        *self.message.write() = None;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        self.healthy.store(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }

    fn report(&self) -> ComponentHealthReport {
        ComponentHealthReport {
            name: self.name.to_string(),
            healthy: self.is_healthy(),
            message: self.message(),
        }
    }
}

/// Source workers: how many were started and which have died.
///
/// A pool with no sources is healthy; records then carry loop data only.
#[derive(Debug)]
pub struct WorkerPoolHealth {
    started: AtomicUsize,
    failed: RwLock<Vec<String>>,
}

impl WorkerPoolHealth {
    pub const fn new() -> Self {
        Self {
            started: AtomicUsize::new(0),
            failed: RwLock::new(Vec::new()),
        }
    }

    pub fn set_started(&self, workers: usize) {
        self.started.store(workers, Ordering::Relaxed);
    }

    /// Marks the worker for `source` as terminated abnormally.
    pub fn record_failure(&self, source: impl Into<String>) {
        let source = source.into();
        let mut failed = self.failed.write();
        if !failed.contains(&source) {
            failed.push(source);
        }
    }

    pub fn failed(&self) -> Vec<String> {
        self.failed.read().clone()
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::Relaxed)
    }

    pub fn is_healthy(&self) -> bool {
        self.failed.read().is_empty()
    }

    fn report(&self) -> ComponentHealthReport {
        let failed = self.failed.read();
        let message = (!failed.is_empty()).then(|| {
            format!(
                "{} of {} workers stopped: {}",
                failed.len(),
                self.started(),
                failed.join(", ")
            )
        });
        ComponentHealthReport {
            name: "workers".to_string(),
            healthy: failed.is_empty(),
            message,
        }
    }
}

impl Default for WorkerPoolHealth {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealthReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
}

/// Health registry: the archive database and the worker pool.
pub struct HealthRegistry {
    pub clickhouse: ComponentHealth,
    pub workers: WorkerPoolHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            clickhouse: ComponentHealth::new("clickhouse"),
            workers: WorkerPoolHealth::new(),
        }
    }

    /// Losing storage is unhealthy; losing only sources is degraded.
    pub fn report(&self) -> HealthReport {
        let clickhouse = self.clickhouse.report();
        let workers = self.workers.report();

        let status = match (clickhouse.healthy, workers.healthy) {
            (true, true) => HealthStatus::Healthy,
            (true, false) => HealthStatus::Degraded,
            (false, _) => HealthStatus::Unhealthy,
        };

        HealthReport {
            status,
            components: vec![clickhouse, workers],
        }
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: std::sync::LazyLock<HealthRegistry> =
    std::sync::LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
