//! Allow-list operations for warden.
//!
//! The [`Gateway`] owns the snapshot cache and the shared access-control
//! services, and exposes one operation per user-facing command. Transports
//! call [`Gateway::dispatch`], which runs the guard chain before any
//! operation body executes.
//!
//! # Example
//!
//! ```
//! use warden_core::{ChannelId, UserId};
//! use warden_gateway::{Caller, Gateway, GatewaySettingsBuilder, Request, Response};
//! use warden_security::PermissionConfig;
//! use warden_store::InMemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let settings = GatewaySettingsBuilder::default()
//!     .permissions(PermissionConfig::new(ChannelId(1), [UserId(99)]))
//!     .build()
//!     .unwrap();
//! let gateway = Gateway::new(InMemoryStore::new(), settings);
//!
//! let caller = Caller::new(UserId(5), ChannelId(1));
//! let response = gateway.dispatch(caller, Request::ListUids).await;
//! assert!(matches!(response, Response::Entries(entries) if entries.is_empty()));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod gateway;
mod request;

pub use command::{help_text, Command};
pub use gateway::{Gateway, GatewaySettings, GatewaySettingsBuilder, GatewaySettingsBuilderError};
pub use request::{Caller, Request, Response};
