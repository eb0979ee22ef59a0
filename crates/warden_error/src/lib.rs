//! Error types for the warden workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use warden_error::{ConfigError, WardenResult};
//!
//! fn load() -> WardenResult<String> {
//!     Err(ConfigError::new("store.url is required"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discord;
mod error;
mod json;
mod store;

pub use config::ConfigError;
pub use discord::{DiscordError, DiscordErrorKind, DiscordResult};
pub use error::{WardenError, WardenErrorKind, WardenResult};
pub use json::JsonError;
pub use store::{StoreError, StoreErrorKind, StoreResult};
