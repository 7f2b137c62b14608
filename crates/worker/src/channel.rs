//! Channels between a source worker and the coordinator.
//!
//! The result side is a single slot: publishing replaces whatever the
//! coordinator has not consumed yet, so a drain sees at most the freshest
//! package. The control side carries only the shutdown sentinel.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use supp_core::FieldPackage;
use tokio::sync::watch;

/// Latest-wins result slot.
#[derive(Debug, Default)]
pub struct ResultSlot {
    slot: Mutex<Option<FieldPackage>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `package`, returning `true` if it replaced an unconsumed one.
    pub fn publish(&self, package: FieldPackage) -> bool {
        self.slot.lock().replace(package).is_some()
    }

    /// Removes and returns the pending package, never blocking on the
    /// publisher.
    pub fn take(&self) -> Option<FieldPackage> {
        self.slot.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

/// A source's result slot as seen by the coordinator.
#[derive(Debug, Clone)]
pub struct SourceSlot {
    pub name: String,
    pub slot: Arc<ResultSlot>,
}

/// Outcome of waiting on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// The wait timed out; poll again.
    Timeout,
    Shutdown,
}

/// Sending half held by the scheduler.
#[derive(Debug)]
pub struct ControlSender(watch::Sender<bool>);

impl ControlSender {
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }
}

/// Receiving half held by the worker.
#[derive(Debug, Clone)]
pub struct ControlReceiver(watch::Receiver<bool>);

impl ControlReceiver {
    pub fn is_shutdown(&self) -> bool {
        *self.0.borrow()
    }

    /// Waits up to `timeout` for the shutdown sentinel.
    ///
    /// Returns immediately if shutdown was already requested. A dropped
    /// sender counts as shutdown.
    pub async fn wait(&mut self, timeout: Duration) -> ControlSignal {
        if *self.0.borrow_and_update() {
            return ControlSignal::Shutdown;
        }

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, self.0.changed()).await {
                Err(_) => return ControlSignal::Timeout,
                Ok(Err(_)) => return ControlSignal::Shutdown,
                Ok(Ok(())) => {
                    if *self.0.borrow_and_update() {
                        return ControlSignal::Shutdown;
                    }
                }
            }
        }
    }
}

pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = watch::channel(false);
    (ControlSender(tx), ControlReceiver(rx))
}
