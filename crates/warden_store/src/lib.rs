//! Remote document store access for the warden allow-list.
//!
//! The store only supports reading and replacing the whole document. There is
//! no partial update, no versioning and no server-side locking, so callers
//! doing read-modify-write can lose updates when their writes interleave.
//!
//! # Backends
//!
//! - `JsonBinStore` - JSONBin-style HTTP endpoint (`GET`/`PUT` on one URL)
//! - `InMemoryStore` - process-local document for tests and offline dumps

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod jsonbin;
mod memory;
mod store;

pub use jsonbin::{decode_document, JsonBinStore, DEFAULT_TIMEOUT};
pub use memory::InMemoryStore;
pub use store::DocumentStore;
