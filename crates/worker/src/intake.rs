//! Primary event intake.
//!
//! Lines are read on a plain thread and handed over a channel, so a quiet
//! primary pipeline never holds up shutdown. Shutdown is only observed
//! between lines: an archive cycle that has started always completes or
//! fails visibly.

use std::future::Future;
use std::io::BufRead;

use supp_core::PrimaryEvent;
use telemetry::health;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::coordinator::ArchiveCoordinator;

const LINE_BUFFER: usize = 64;

/// Why intake stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeEnd {
    /// The primary pipeline closed its stream.
    StreamClosed,
    /// The shutdown signal fired.
    Shutdown,
}

/// Outcome of one intake run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReport {
    pub end: IntakeEnd,
    pub loop_packets: u64,
    pub archive_cycles: u64,
    pub failed_cycles: u64,
    pub malformed_lines: u64,
}

impl IntakeReport {
    fn new() -> Self {
        Self {
            end: IntakeEnd::StreamClosed,
            loop_packets: 0,
            archive_cycles: 0,
            failed_cycles: 0,
            malformed_lines: 0,
        }
    }
}

/// Reads `reader` line by line on a dedicated thread.
///
/// The thread ends at EOF, on a read error, or once the receiver is gone.
/// It is never joined; a blocked read does not keep the process alive.
pub fn spawn_line_reader<R>(reader: R) -> std::io::Result<mpsc::Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    std::thread::Builder::new()
        .name("primary-intake".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read primary event stream");
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// Feeds newline-delimited primary events to the coordinator until the
/// stream closes or `shutdown` resolves.
pub async fn run_intake<F>(
    coordinator: &mut ArchiveCoordinator,
    lines: &mut mpsc::Receiver<String>,
    shutdown: F,
) -> IntakeReport
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut report = IntakeReport::new();

    report.end = loop {
        let line = tokio::select! {
            biased;
            _ = &mut shutdown => break IntakeEnd::Shutdown,
            line = lines.recv() => match line {
                Some(line) => line,
                None => break IntakeEnd::StreamClosed,
            },
        };

        handle_line(coordinator, &line, &mut report).await;
    };

    match report.end {
        IntakeEnd::StreamClosed => info!("Primary event stream closed"),
        IntakeEnd::Shutdown => info!("Primary event intake stopped"),
    }
    report
}

async fn handle_line(coordinator: &mut ArchiveCoordinator, line: &str, report: &mut IntakeReport) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let event: PrimaryEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            report.malformed_lines += 1;
            warn!(error = %e, "Skipping malformed primary event");
            return;
        }
    };

    match event {
        PrimaryEvent::Loop { packet } => {
            report.loop_packets += 1;
            coordinator.on_loop_packet(&packet);
        }
        PrimaryEvent::Archive { record } => match coordinator.on_archive_event(&record).await {
            Ok(saved) => {
                report.archive_cycles += 1;
                health().clickhouse.set_healthy();
                debug!(
                    timestamp = saved.timestamp,
                    fields = saved.fields.len(),
                    "Archive cycle complete"
                );
            }
            Err(e) => {
                report.failed_cycles += 1;
                error!(
                    timestamp = record.date_time,
                    code = e.store_code(),
                    "Archive cycle failed: {}",
                    e
                );
                health().clickhouse.set_unhealthy(e.to_string());
            }
        },
    }
}
