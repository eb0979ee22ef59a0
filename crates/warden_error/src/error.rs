//! Top-level error wrapper types.

use crate::{ConfigError, DiscordError, JsonError, StoreError};

/// Every error the warden binary can surface.
///
/// # Examples
///
/// ```
/// use warden_error::{StoreError, StoreErrorKind, WardenError};
///
/// let err: WardenError = StoreError::new(StoreErrorKind::Timeout(10)).into();
/// assert!(format!("{}", err).contains("Store Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum WardenErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Remote document store error
    #[from(StoreError)]
    Store(StoreError),
    /// Discord transport error
    #[from(DiscordError)]
    Discord(DiscordError),
}

/// Warden error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Warden Error: {}", _0)]
pub struct WardenError(Box<WardenErrorKind>);

impl WardenError {
    /// Create a new error from a kind.
    pub fn new(kind: WardenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WardenErrorKind {
        &self.0
    }
}

impl<T> From<T> for WardenError
where
    T: Into<WardenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for warden operations.
pub type WardenResult<T> = std::result::Result<T, WardenError>;
