//! Background source workers and the archive coordinator.
//!
//! Each source runs in its own task and publishes into a single-slot
//! channel. The coordinator drains those slots once per archive period,
//! merges them with stashed loop data and persists the composite record.

pub mod channel;
pub mod coordinator;
pub mod intake;
pub mod retention;
pub mod retry;
pub mod scheduler;
pub mod source_worker;
pub mod stash;

pub use channel::*;
pub use coordinator::{ArchiveConfig, ArchiveCoordinator};
pub use intake::{run_intake, spawn_line_reader, IntakeEnd, IntakeReport};
pub use retention::{CompactionOutcome, MaintenanceReport, RetentionManager};
pub use retry::RetryPolicy;
pub use scheduler::*;
pub use source_worker::{SourceWorker, WorkerState, WorkerStatus};
pub use stash::Stash;
