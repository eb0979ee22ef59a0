//! Store trait.

use async_trait::async_trait;
use warden_core::Entry;
use warden_error::StoreResult;

/// A remote document holding the whole allow-list.
///
/// Implementations keep no state beyond their connection parameters.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the whole document.
    ///
    /// # Errors
    ///
    /// Fails on timeout, non-success status, transport failure, or when the
    /// payload is a list whose elements are not entries. A payload that is not
    /// a list at all decodes to an empty document.
    async fn fetch(&self) -> StoreResult<Vec<Entry>>;

    /// Overwrite the whole document with `entries`.
    ///
    /// Returns `false` on timeout or non-success status; never errors.
    async fn replace(&self, entries: &[Entry]) -> bool;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
