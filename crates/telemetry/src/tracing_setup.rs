//! Tracing setup for structured logging.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// HTTP client internals log every connection at debug; provider polls
/// already log their outcome.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn"];

/// Logging configuration, loaded from the `[logging]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Filter directives, e.g. "info" or "worker=debug,sources=trace".
    #[serde(default = "default_filter")]
    pub filter: String,
    /// One JSON object per line instead of the human format.
    #[serde(default)]
    pub json: bool,
    /// Write through the libtest capture instead of stdout.
    #[serde(skip)]
    pub test_writer: bool,
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
            test_writer: false,
        }
    }
}

impl TracingConfig {
    /// Configuration for test binaries: captured output at `filter`.
    pub fn for_tests(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            json: false,
            test_writer: true,
        }
    }

    /// Effective filter: `RUST_LOG` wins over the configured directives,
    /// and unparseable directives fall back to `info`. HTTP internals are
    /// held at `warn` unless a directive names them.
    pub fn env_filter(&self) -> EnvFilter {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.filter.clone());

        let mut filter = EnvFilter::try_new(&directives)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        for quiet in QUIET_DEPENDENCIES {
            let target = quiet.split('=').next().unwrap_or_default();
            if directives.contains(target) {
                continue;
            }
            if let Ok(directive) = quiet.parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    }
}

/// Initialize tracing with the given configuration.
///
/// A second call is a no-op, so tests may call this freely.
pub fn init_tracing(config: &TracingConfig) {
    let env_filter = config.env_filter();

    let result = match (config.json, config.test_writer) {
        (true, _) => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (false, true) => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_test_writer().with_target(true))
            .try_init(),
        (false, false) => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init(),
    };

    if result.is_ok() {
        tracing::info!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
}
