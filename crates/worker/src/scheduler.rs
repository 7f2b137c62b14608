//! Spawns and supervises one task per source.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sources::Source;
use telemetry::health;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::channel::{control_channel, ControlSender, ResultSlot, SourceSlot};
use crate::source_worker::{SourceWorker, WorkerState, WorkerStatus};

/// The `[workers]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Bounded wait on the control channel between polls.
    #[serde(default = "default_poll_wait")]
    pub poll_wait_secs: u64,
    /// How long shutdown waits for each worker to finish.
    #[serde(default = "default_join_timeout")]
    pub join_timeout_secs: u64,
}

fn default_poll_wait() -> u64 {
    60
}

fn default_join_timeout() -> u64 {
    10
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_wait_secs: default_poll_wait(),
            join_timeout_secs: default_join_timeout(),
        }
    }
}

impl WorkerConfig {
    pub fn poll_wait(&self) -> Duration {
        Duration::from_secs(self.poll_wait_secs)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }
}

struct Handle {
    name: String,
    control: ControlSender,
    status: WorkerStatus,
    task: JoinHandle<()>,
}

/// Background worker scheduler.
pub struct WorkerScheduler {
    config: WorkerConfig,
    workers: Vec<Handle>,
    slots: Vec<SourceSlot>,
}

impl WorkerScheduler {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            workers: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Starts a worker for `source` and returns the slot the coordinator
    /// drains. Slots keep spawn order.
    pub fn spawn(&mut self, source: Box<dyn Source>) -> SourceSlot {
        let name = source.name().to_string();
        let slot = Arc::new(ResultSlot::new());
        let (control, receiver) = control_channel();

        let worker = SourceWorker::new(source, slot.clone(), receiver, self.config.poll_wait());
        let status = worker.status();
        let task = supervise(name.clone(), status.clone(), worker);

        info!(source = %name, poll_wait_secs = self.config.poll_wait_secs, "Source worker spawned");

        let source_slot = SourceSlot { name: name.clone(), slot };
        self.slots.push(source_slot.clone());
        self.workers.push(Handle {
            name,
            control,
            status,
            task,
        });
        source_slot
    }

    pub fn slots(&self) -> Vec<SourceSlot> {
        self.slots.clone()
    }

    pub fn statuses(&self) -> Vec<(String, WorkerState)> {
        self.workers
            .iter()
            .map(|w| (w.name.clone(), w.status.get()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Signals every worker, then waits for each up to the join timeout.
    pub async fn shutdown(self) {
        for worker in &self.workers {
            worker.control.shutdown();
        }

        let join_timeout = self.config.join_timeout();
        for worker in self.workers {
            match tokio::time::timeout(join_timeout, worker.task).await {
                Ok(_) => info!(source = %worker.name, "Source worker joined"),
                Err(_) => warn!(
                    source = %worker.name,
                    timeout_secs = join_timeout.as_secs(),
                    "Source worker did not stop in time"
                ),
            }
        }
    }
}

/// Runs the worker in its own task and reports a panic instead of losing it.
fn supervise(name: String, status: WorkerStatus, worker: SourceWorker) -> JoinHandle<()> {
    tokio::spawn(async move {
        let inner = tokio::spawn(worker.run());
        if let Err(e) = inner.await {
            status.set(WorkerState::Terminated);
            if e.is_panic() {
                error!(source = %name, "Source worker panicked");
                health().workers.record_failure(name);
            } else {
                error!(source = %name, error = %e, "Source worker aborted");
            }
        }
    })
}
