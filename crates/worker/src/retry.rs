//! Bounded retry for storage operations.

use std::future::Future;
use std::time::Duration;

use supp_core::Error;
use tracing::error;

/// Attempt budget with a fixed wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_tries: u32,
    pub retry_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: 3,
            retry_wait: Duration::from_secs(2),
        }
    }
}

/// Every attempt failed.
#[derive(Debug)]
pub struct Exhausted {
    pub attempts: u32,
    pub last_error: Error,
}

impl RetryPolicy {
    pub fn new(max_tries: u32, retry_wait: Duration) -> Self {
        Self {
            max_tries: max_tries.max(1),
            retry_wait,
        }
    }

    /// Runs `op` until it succeeds or the budget is spent, sleeping
    /// `retry_wait` between attempts (not after the last one).
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, Exhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let max_tries = self.max_tries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    error!(
                        operation = what,
                        attempt = attempt,
                        max_tries = max_tries,
                        error = %e,
                        "Storage operation failed"
                    );
                    if attempt >= max_tries {
                        return Err(Exhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }
                    tokio::time::sleep(self.retry_wait).await;
                }
            }
        }
    }
}
