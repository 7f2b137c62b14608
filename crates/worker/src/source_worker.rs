//! The per-source polling loop.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sources::Source;
use telemetry::{metrics, Gauge};
use tracing::{debug, info};

use crate::channel::{ControlReceiver, ControlSignal, ResultSlot};

/// Lifecycle of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Idle = 0,
    Polling = 1,
    ShuttingDown = 2,
    Terminated = 3,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Polling,
            2 => Self::ShuttingDown,
            _ => Self::Terminated,
        }
    }
}

/// Shared view of a worker's state.
#[derive(Debug, Clone)]
pub struct WorkerStatus(Arc<AtomicU8>);

impl WorkerStatus {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(WorkerState::Idle as u8)))
    }

    pub fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Drives one [`Source`]: fetch, parse, publish, then wait on the control
/// channel for at most `poll_wait` before the next round.
pub struct SourceWorker {
    source: Box<dyn Source>,
    slot: Arc<ResultSlot>,
    control: ControlReceiver,
    poll_wait: Duration,
    status: WorkerStatus,
}

impl SourceWorker {
    pub fn new(
        source: Box<dyn Source>,
        slot: Arc<ResultSlot>,
        control: ControlReceiver,
        poll_wait: Duration,
    ) -> Self {
        Self {
            source,
            slot,
            control,
            poll_wait,
            status: WorkerStatus::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn status(&self) -> WorkerStatus {
        self.status.clone()
    }

    /// One Polling pass. Returns `true` if a package was published.
    pub async fn poll_once(&mut self, now: DateTime<Utc>) -> bool {
        self.status.set(WorkerState::Polling);
        let published = match self.source.fetch_raw(now).await {
            Some(raw) => match self.source.parse(raw) {
                Some(package) => {
                    debug!(
                        source = %self.source.name(),
                        fields = package.len(),
                        "Publishing package"
                    );
                    metrics().packages_published.inc();
                    if self.slot.publish(package) {
                        metrics().packages_superseded.inc();
                        debug!(source = %self.source.name(), "Superseded unconsumed package");
                    }
                    true
                }
                None => false,
            },
            None => false,
        };
        self.status.set(WorkerState::Idle);
        published
    }

    /// Polls until the shutdown sentinel arrives.
    pub async fn run(mut self) {
        info!(source = %self.source.name(), "Source worker started");
        let _active = ActiveWorker::enter(&metrics().active_workers);

        while !self.control.is_shutdown() {
            self.poll_once(Utc::now()).await;
            if self.control.wait(self.poll_wait).await == ControlSignal::Shutdown {
                break;
            }
        }

        self.status.set(WorkerState::ShuttingDown);
        info!(source = %self.source.name(), "Source worker stopped");
        self.status.set(WorkerState::Terminated);
    }
}

/// Holds one count in the active-worker gauge; released on return, panic
/// or cancellation alike.
struct ActiveWorker<'a>(&'a Gauge);

impl<'a> ActiveWorker<'a> {
    fn enter(gauge: &'a Gauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for ActiveWorker<'_> {
    fn drop(&mut self) {
        self.0.dec();
    }
}
