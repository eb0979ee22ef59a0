//! In-memory document store.

use crate::DocumentStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use warden_core::Entry;
use warden_error::{StoreError, StoreErrorKind, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    document: Mutex<Vec<Entry>>,
    fetches: AtomicUsize,
    replaces: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

/// Process-local document with the same full-document contract as the remote store.
///
/// Clones share the same document. Reads and writes are counted, can be made
/// to fail, and can be delayed to widen interleavings in concurrency tests.
///
/// # Example
///
/// ```
/// use warden_store::{DocumentStore, InMemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = InMemoryStore::new();
/// assert!(store.fetch().await.unwrap().is_empty());
/// assert_eq!(store.fetch_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `entries`.
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let store = Self::new();
        *store.inner.document.lock() = entries;
        store
    }

    /// Current document, bypassing the counters.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.inner.document.lock().clone()
    }

    /// Number of `fetch` calls so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Number of `replace` calls so far, failed ones included.
    pub fn replace_count(&self) -> usize {
        self.inner.replaces.load(Ordering::SeqCst)
    }

    /// Make subsequent reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.inner.latency.lock() = latency;
    }

    async fn simulate_latency(&self) {
        let latency = *self.inner.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn fetch(&self) -> StoreResult<Vec<Entry>> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::new(StoreErrorKind::Unavailable(
                "reads disabled".to_string(),
            )));
        }

        let document = self.inner.document.lock().clone();
        debug!(entry_count = document.len(), "In-memory fetch");
        Ok(document)
    }

    async fn replace(&self, entries: &[Entry]) -> bool {
        self.inner.replaces.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.inner.fail_writes.load(Ordering::SeqCst) {
            debug!("In-memory replace refused");
            return false;
        }

        *self.inner.document.lock() = entries.to_vec();
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
