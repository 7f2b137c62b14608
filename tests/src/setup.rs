//! Common test setup functions.

use std::sync::{Arc, Once};
use std::time::Duration;

use sources::{ConditionsSource, ForecastSource, Source};
use supp_core::RetentionPolicy;
use telemetry::{init_tracing, TracingConfig};
use worker::{ArchiveConfig, ArchiveCoordinator, ResultSlot, SourceSlot};

use crate::fixtures;
use crate::mocks::{MemoryStore, StubTransport};

static TRACING: Once = Once::new();

/// Routes test logs through the same subscriber set-up as the binary.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        init_tracing(&TracingConfig::for_tests("warn"));
    });
}

/// A coordinator wired to a memory store and plain result slots.
///
/// Storage retries do not wait, so failure scenarios run instantly.
pub struct TestContext {
    pub store: MemoryStore,
    pub slots: Vec<SourceSlot>,
    pub coordinator: ArchiveCoordinator,
}

impl TestContext {
    /// Creates a context with one slot per name, in order.
    pub fn new(source_names: &[&str], retention: RetentionPolicy) -> Self {
        Self::with_config(
            source_names,
            ArchiveConfig {
                retention,
                database_max_tries: 3,
                database_retry_wait: 0,
            },
        )
    }

    /// Creates a context with explicit storage retry settings.
    pub fn with_config(source_names: &[&str], config: ArchiveConfig) -> Self {
        init_test_tracing();

        let store = MemoryStore::new();
        let slots: Vec<SourceSlot> = source_names
            .iter()
            .map(|name| SourceSlot {
                name: name.to_string(),
                slot: Arc::new(ResultSlot::new()),
            })
            .collect();

        let coordinator = ArchiveCoordinator::new(slots.clone(), Arc::new(store.clone()), &config);

        Self {
            store,
            slots,
            coordinator,
        }
    }

    /// A context with retention disabled.
    pub fn without_retention(source_names: &[&str]) -> Self {
        Self::new(source_names, RetentionPolicy::new(0, 0))
    }

    pub fn slot(&self, name: &str) -> &ResultSlot {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.slot.as_ref())
            .unwrap_or_else(|| panic!("no slot named {}", name))
    }
}

/// A forecast source over a stub transport.
pub fn forecast_source(transport: &StubTransport) -> Box<dyn Source> {
    Box::new(
        ForecastSource::new(&fixtures::forecast_config(), Arc::new(transport.clone()))
            .expect("forecast source config is valid"),
    )
}

/// A conditions source over a stub transport.
pub fn conditions_source(transport: &StubTransport) -> Box<dyn Source> {
    Box::new(
        ConditionsSource::new(&fixtures::conditions_config(), Arc::new(transport.clone()))
            .expect("conditions source config is valid"),
    )
}

/// Gives spawned workers time to finish a poll.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
