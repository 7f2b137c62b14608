//! Telemetry for the supplementary archiver.
//!
//! Counters and health flags live in process-wide registries; they are
//! reported through the structured log rather than an external sink.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
