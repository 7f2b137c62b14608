//! The source capability driven by workers.

use async_trait::async_trait;
use chrono::{DateTime, Local, Timelike, Utc};
use supp_core::FieldPackage;

/// An unparsed provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl RawResponse {
    pub fn new(body: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            body: body.into(),
            fetched_at,
        }
    }

    /// Hour of the fetch in the station's local time.
    pub fn local_hour(&self) -> u32 {
        self.fetched_at.with_timezone(&Local).hour()
    }
}

/// A rate-limited external data provider.
///
/// `fetch_raw` returns `None` when the limiter refuses the call or every
/// attempt failed; `parse` returns `None` for payloads it cannot use. Neither
/// reports errors to the caller: a missing package just means no data this
/// cycle.
#[async_trait]
pub trait Source: Send + 'static {
    /// Stable name used in logs and to order merges.
    fn name(&self) -> &str;

    async fn fetch_raw(&mut self, now: DateTime<Utc>) -> Option<RawResponse>;

    fn parse(&self, raw: RawResponse) -> Option<FieldPackage>;
}
