//! Mock implementations for testing.

use async_trait::async_trait;
use clickhouse_client::ArchiveStore;
use parking_lot::Mutex;
use sources::Transport;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use supp_core::{CompositeRecord, Error, Result};
use url::Url;

/// In-memory archive keyed by record timestamp.
///
/// Implements the same `ArchiveStore` trait as the ClickHouse store, with
/// the same upsert-per-timestamp behavior. Failures are scripted: the next
/// `n` calls of an operation fail before it starts succeeding again.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<BTreeMap<i64, CompositeRecord>>>,
    insert_failures: Arc<AtomicU32>,
    delete_failures: Arc<AtomicU32>,
    compact_failures: Arc<AtomicU32>,
    insert_calls: Arc<AtomicU32>,
    delete_calls: Arc<AtomicU32>,
    compactions: Arc<AtomicU32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `n` inserts.
    pub fn fail_inserts(&self, n: u32) {
        self.insert_failures.store(n, Ordering::SeqCst);
    }

    /// Fails the next `n` deletes.
    pub fn fail_deletes(&self, n: u32) {
        self.delete_failures.store(n, Ordering::SeqCst);
    }

    /// Fails the next `n` compactions.
    pub fn fail_compactions(&self, n: u32) {
        self.compact_failures.store(n, Ordering::SeqCst);
    }

    /// Seeds a row without going through `insert`.
    pub fn put(&self, record: CompositeRecord) {
        self.rows.lock().insert(record.timestamp, record);
    }

    pub fn rows(&self) -> Vec<CompositeRecord> {
        self.rows.lock().values().cloned().collect()
    }

    pub fn row(&self, timestamp: i64) -> Option<CompositeRecord> {
        self.rows.lock().get(&timestamp).cloned()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.rows.lock().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    pub fn insert_calls(&self) -> u32 {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> u32 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Compaction attempts, failed ones included.
    pub fn compactions(&self) -> u32 {
        self.compactions.load(Ordering::SeqCst)
    }
}

/// Decrements `counter` if positive, returning whether a failure is due.
fn take_failure(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl ArchiveStore for MemoryStore {
    async fn insert(&self, record: &CompositeRecord) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.insert_failures) {
            return Err(Error::store("Mock insert failure"));
        }
        self.rows.lock().insert(record.timestamp, record.clone());
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<u64> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.delete_failures) {
            return Err(Error::store("Mock delete failure"));
        }
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|ts, _| *ts >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn compact(&self) -> Result<()> {
        self.compactions.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.compact_failures) {
            return Err(Error::store("Mock compaction failure"));
        }
        Ok(())
    }
}

/// One scripted transport reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    /// Simulated timeout or connection failure.
    Unreachable,
}

/// Transport that replays scripted replies and counts calls.
///
/// Once the script is exhausted the last reply repeats; an empty script
/// answers `Unreachable`.
#[derive(Clone, Default)]
pub struct StubTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    last: Arc<Mutex<Option<Reply>>>,
    calls: Arc<AtomicU32>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that always answers `body`.
    pub fn always(body: impl Into<String>) -> Self {
        let stub = Self::new();
        stub.push(Reply::Body(body.into()));
        stub
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().push_back(reply);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requested URLs, in call order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.to_string());

        let reply = {
            let mut replies = self.replies.lock();
            let mut last = self.last.lock();
            match replies.pop_front() {
                Some(reply) => {
                    *last = Some(reply.clone());
                    Some(reply)
                }
                None => last.clone(),
            }
        };

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Unreachable) | None => Err(Error::transport("Mock transport unreachable")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supp_core::{ArchiveEvent, UnitSystem};

    fn record(ts: i64) -> CompositeRecord {
        CompositeRecord::from_event(&ArchiveEvent {
            date_time: ts,
            us_units: UnitSystem::Metric,
            interval: 5,
        })
    }

    #[tokio::test]
    async fn test_memory_store_upserts_by_timestamp() {
        let store = MemoryStore::new();
        store.insert(&record(100)).await.unwrap();
        store.insert(&record(100)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.insert_calls(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_scripted_failures() {
        let store = MemoryStore::new();
        store.fail_inserts(1);
        assert!(store.insert(&record(100)).await.is_err());
        assert!(store.insert(&record(100)).await.is_ok());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_stub_transport_repeats_last_reply() {
        let stub = StubTransport::new();
        stub.push(Reply::Unreachable);
        stub.push(Reply::Body("ok".into()));
        let url = Url::parse("https://api.example.test/v1").unwrap();

        assert!(stub.get(&url).await.is_err());
        assert_eq!(stub.get(&url).await.unwrap(), "ok");
        assert_eq!(stub.get(&url).await.unwrap(), "ok");
        assert_eq!(stub.calls(), 3);
    }
}
