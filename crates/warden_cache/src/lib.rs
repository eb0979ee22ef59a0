//! Snapshot caching with TTL and stale-if-error.
//!
//! This crate keeps one time-boxed copy of the remote allow-list so that
//! read commands do not hit the store on every invocation.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheConfig, CacheConfigBuilder, SnapshotCache, DEFAULT_TTL_SECS};
