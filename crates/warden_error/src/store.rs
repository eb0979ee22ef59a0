//! Remote document store error types.

/// Kinds of remote store failures.
///
/// Every variant is a network-level failure from the caller's point of view:
/// the cache degrades to stale data on reads and reports `false` on writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoreErrorKind {
    /// The request did not complete within the configured timeout
    #[display("Request timed out after {}s", _0)]
    Timeout(u64),
    /// The store answered with a non-success status
    #[display("Store returned status {}: {}", status, body)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },
    /// Connection or protocol failure before a response arrived
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// The document could not be decoded as a list of entries
    ///
    /// Older deployments wrote expiry dates without checking them, so a bin
    /// may hold dates such as `2025-13-01`. Such a bin fails every fetch until
    /// the named entry is corrected by hand.
    #[display("Malformed document: {}", _0)]
    Decode(String),
    /// Store was told to fail (in-memory backend)
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
}

/// Remote store error with location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Timeout(10));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoreErrorKind {
        &self.kind
    }
}

/// Result type for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;
