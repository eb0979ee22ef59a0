//! Snapshot cache implementation.

use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use warden_core::Entry;
use warden_error::StoreResult;
use warden_store::DocumentStore;

/// Default snapshot lifetime in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Configuration for the snapshot cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct CacheConfig {
    /// Maximum age of a snapshot served without refetching (seconds)
    #[serde(default = "default_ttl")]
    #[builder(default = "DEFAULT_TTL_SECS")]
    ttl_secs: u64,
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECS
}

impl CacheConfig {
    /// Snapshot lifetime as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

/// Last good copy of the document and when it was obtained.
#[derive(Debug, Clone)]
struct Snapshot {
    entries: Vec<Entry>,
    fetched_at: Instant,
}

/// Snapshot plus a counter bumped by every successful commit.
#[derive(Debug, Default)]
struct CacheState {
    snapshot: Option<Snapshot>,
    generation: u64,
}

/// Time-boxed copy of the remote document.
///
/// Reads within the TTL are served from memory. Expired or forced reads go to
/// the store; if that fails the last good snapshot is served instead, or an
/// empty list when nothing was ever fetched. Successful writes through
/// [`SnapshotCache::commit`] replace the snapshot directly.
///
/// The snapshot lock is never held across a store call. A fetch that was
/// already in flight when a commit landed is discarded, so the snapshot never
/// moves back to a document older than the last successful write.
///
/// # Example
///
/// ```
/// use warden_cache::{CacheConfig, SnapshotCache};
/// use warden_store::InMemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = InMemoryStore::new();
/// let cache = SnapshotCache::new(store.clone(), CacheConfig::default());
///
/// cache.read(false).await;
/// cache.read(false).await;
/// assert_eq!(store.fetch_count(), 1);
/// # }
/// ```
pub struct SnapshotCache<S> {
    store: S,
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl<S: DocumentStore> SnapshotCache<S> {
    /// Create an empty cache in front of `store`.
    pub fn new(store: S, config: CacheConfig) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            backend = store.backend_name(),
            "Creating new SnapshotCache"
        );
        Self {
            store,
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Current entries, refetching when stale or when `force_refresh` is set.
    ///
    /// Never fails: store errors fall back to the last snapshot, however old,
    /// or to an empty list.
    #[tracing::instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn read(&self, force_refresh: bool) -> Vec<Entry> {
        if !force_refresh {
            if let Some(entries) = self.fresh_entries() {
                tracing::debug!(entry_count = entries.len(), "Cache hit");
                return entries;
            }
            tracing::debug!("Cache miss or expired");
        }

        match self.refresh().await {
            Ok(entries) => entries,
            Err(e) => {
                let stale = self.state.lock().snapshot.as_ref().map(|s| s.entries.clone());
                match stale {
                    Some(entries) => {
                        tracing::warn!(error = %e, "Store read failed, serving stale snapshot");
                        entries
                    }
                    None => {
                        tracing::warn!(error = %e, "Store read failed and no snapshot exists");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Fetch from the store unconditionally and install the result.
    ///
    /// If a commit succeeded while the fetch was in flight, the fetched
    /// document is older than that write; it is dropped and the committed
    /// snapshot is returned instead.
    ///
    /// # Errors
    ///
    /// Returns the store error; the existing snapshot is left untouched.
    #[tracing::instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn refresh(&self) -> StoreResult<Vec<Entry>> {
        let started = self.state.lock().generation;
        let entries = self.store.fetch().await?;

        let mut state = self.state.lock();
        if state.generation != started {
            if let Some(current) = state.snapshot.as_ref() {
                tracing::debug!(
                    started,
                    current = state.generation,
                    "Commit landed during fetch, keeping committed snapshot"
                );
                return Ok(current.entries.clone());
            }
        }
        state.snapshot = Some(Snapshot {
            entries: entries.clone(),
            fetched_at: Instant::now(),
        });
        tracing::debug!(entry_count = entries.len(), "Snapshot refreshed");
        Ok(entries)
    }

    /// Write `entries` as the whole document.
    ///
    /// On success the snapshot becomes `entries` with a fresh timestamp. On
    /// failure the snapshot is left as it was.
    #[tracing::instrument(skip(self, entries), fields(entry_count = entries.len()))]
    pub async fn commit(&self, entries: Vec<Entry>) -> bool {
        if !self.store.replace(&entries).await {
            tracing::warn!("Store write failed, snapshot unchanged");
            return false;
        }
        let mut state = self.state.lock();
        state.generation += 1;
        state.snapshot = Some(Snapshot {
            entries,
            fetched_at: Instant::now(),
        });
        true
    }

    /// Age of the current snapshot, if any.
    pub fn snapshot_age(&self) -> Option<Duration> {
        self.state.lock().snapshot.as_ref().map(|s| s.fetched_at.elapsed())
    }

    /// Drop the snapshot so the next read refetches.
    pub fn invalidate(&self) {
        self.state.lock().snapshot = None;
        tracing::info!("Snapshot invalidated");
    }

    /// Cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The store behind this cache.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn fresh_entries(&self) -> Option<Vec<Entry>> {
        let state = self.state.lock();
        let snapshot = state.snapshot.as_ref()?;
        if snapshot.fetched_at.elapsed() < self.config.ttl() {
            Some(snapshot.entries.clone())
        } else {
            None
        }
    }
}
