//! Supplementary weather archiver
//!
//! Background acquisition and archival alongside a primary station pipeline:
//! - Rate-limited polling of forecast and conditions providers
//! - Latest-wins hand-off from source workers to the archive coordinator
//! - One merged ClickHouse row per archive period
//! - Age-based retention with periodic compaction

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use clickhouse_client::{ClickHouseClient, ClickHouseConfig, ClickHouseStore};
use sources::{ConditionsSource, ForecastSource, HttpTransport, Source, SourcesConfig, Transport};
use telemetry::{health, init_tracing, metrics, TracingConfig};
use worker::{
    run_intake, spawn_line_reader, ArchiveConfig, ArchiveCoordinator, WorkerConfig,
    WorkerScheduler,
};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    logging: TracingConfig,

    #[serde(default)]
    archive: ArchiveConfig,

    #[serde(default)]
    clickhouse: ClickHouseConfig,

    #[serde(default)]
    workers: WorkerConfig,

    #[serde(default)]
    sources: SourcesConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_tracing(&config.logging);

    info!("Starting supplementary archiver v{}", env!("CARGO_PKG_VERSION"));

    let clickhouse = ClickHouseClient::new(config.clickhouse.clone())
        .context("Failed to create ClickHouse client")?;

    if let Err(e) = clickhouse_client::health::init_schema(&clickhouse).await {
        error!("Failed to initialize ClickHouse schema: {}", e);
        // Continue anyway - the table may already exist
    }

    check_health(&clickhouse).await;

    let store = Arc::new(ClickHouseStore::new(clickhouse));

    let sources = build_sources(&config.sources)?;
    let mut scheduler = WorkerScheduler::new(config.workers.clone());
    for source in sources {
        scheduler.spawn(source);
    }
    health().workers.set_started(scheduler.len());
    info!(workers = scheduler.len(), "Source workers started");

    let mut coordinator = ArchiveCoordinator::new(scheduler.slots(), store, &config.archive);

    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
        .context("Failed to start primary event reader")?;
    let report = run_intake(&mut coordinator, &mut lines, shutdown_signal()).await;
    info!(
        end = ?report.end,
        loop_packets = report.loop_packets,
        archive_cycles = report.archive_cycles,
        failed_cycles = report.failed_cycles,
        malformed_lines = report.malformed_lines,
        "Primary event intake finished"
    );

    info!("Shutting down...");
    scheduler.shutdown().await;

    log_snapshots();
    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SUPP")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Builds the enabled sources in merge order: forecast, then conditions.
///
/// A source with bad configuration is left out for the life of the process.
fn build_sources(config: &SourcesConfig) -> Result<Vec<Box<dyn Source>>> {
    let mut sources: Vec<Box<dyn Source>> = Vec::new();

    if let Some(forecast) = config.forecast.as_ref().filter(|c| c.common.enabled) {
        let transport: Arc<dyn Transport> = Arc::new(
            HttpTransport::new(forecast.common.timeout())
                .context("Failed to create forecast HTTP transport")?,
        );
        match ForecastSource::new(forecast, transport) {
            Ok(source) => sources.push(Box::new(source)),
            Err(e) => error!(source = ForecastSource::NAME, error = %e, "Source disabled"),
        }
    }

    if let Some(conditions) = config.conditions.as_ref().filter(|c| c.common.enabled) {
        let transport: Arc<dyn Transport> = Arc::new(
            HttpTransport::new(conditions.common.timeout())
                .context("Failed to create conditions HTTP transport")?,
        );
        match ConditionsSource::new(conditions, transport) {
            Ok(source) => sources.push(Box::new(source)),
            Err(e) => error!(source = ConditionsSource::NAME, error = %e, "Source disabled"),
        }
    }

    if sources.is_empty() {
        warn!("No sources enabled; records will carry loop data only");
    }
    Ok(sources)
}

/// Check component health on startup.
async fn check_health(clickhouse: &ClickHouseClient) {
    let ch_healthy = clickhouse_client::health::check_connection(clickhouse).await;
    if ch_healthy {
        health().clickhouse.set_healthy();
        info!("ClickHouse connection: healthy");
    } else {
        health().clickhouse.set_unhealthy("Connection failed");
        error!("ClickHouse connection: unhealthy");
    }
}

fn log_snapshots() {
    match serde_json::to_string(&metrics().snapshot()) {
        Ok(snapshot) => info!(metrics = %snapshot, "Final metrics"),
        Err(e) => warn!("Failed to serialize metrics: {}", e),
    }

    let report = health().report();
    info!(status = ?report.status, "Final health");
    for component in report.components {
        if !component.healthy {
            warn!(
                component = %component.name,
                message = component.message.as_deref().unwrap_or("-"),
                "Component unhealthy"
            );
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
