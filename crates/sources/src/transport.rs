//! HTTP transport and the shared bounded-retry fetch.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use supp_core::{Error, Result};
use telemetry::metrics;
use tracing::{debug, error, warn};
use url::Url;

/// Performs a GET and returns the response body.
///
/// Timeouts, connection failures and non-success statuses are reported as
/// [`Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("supp-archiver/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(e.without_url().to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| Error::transport(e.without_url().to_string()))?;

        response
            .text()
            .await
            .map_err(|e| Error::transport(e.without_url().to_string()))
    }
}

/// Attempt budget for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRetry {
    pub max_tries: u32,
    /// Linear back-off step: the wait before attempt `n + 1` is `backoff * n`.
    pub backoff: Duration,
}

/// Replaces every character of `key` except the last four with `*`.
pub fn obfuscate_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let keep = chars.len().saturating_sub(4);
    let mut out = "*".repeat(keep);
    out.extend(&chars[keep..]);
    out
}

/// GETs `url`, retrying transport errors up to `retry.max_tries` attempts.
///
/// `display_url` is logged in place of `url`, which carries the credential.
/// Returns `None` once attempts are exhausted or on a non-transient error.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &Url,
    display_url: &str,
    retry: FetchRetry,
    api: &str,
) -> Option<String> {
    debug!(api = api, url = %display_url, "Submitting API call");
    let start = Instant::now();

    for attempt in 1..=retry.max_tries.max(1) {
        if attempt > 1 {
            tokio::time::sleep(retry.backoff * (attempt - 1)).await;
        }

        metrics().source_polls.inc();
        match transport.get(url).await {
            Ok(body) => {
                metrics()
                    .fetch_latency_ms
                    .observe(start.elapsed().as_millis() as u64);
                return Some(body);
            }
            Err(e) if e.is_transient() => {
                warn!(api = api, attempt = attempt, error = %e, "API call failed");
            }
            Err(e) => {
                error!(api = api, attempt = attempt, error = %e, "API call failed, not retrying");
                break;
            }
        }
    }

    metrics().fetch_failures.inc();
    error!(api = api, url = %display_url, "Failed to get API response");
    None
}
