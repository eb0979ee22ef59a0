//! Warden - a Discord allow-list bot.
//!
//! Keeps a list of `{uid, expiry_date, comment}` entries in a remote JSON
//! document that only supports whole-document reads and writes, and serves it
//! through slash commands behind channel, owner, pause and rate-limit checks.
//!
//! # Crates
//!
//! - `warden_store` - the remote document and an in-memory stand-in
//! - `warden_cache` - time-boxed snapshot with stale-if-error reads
//! - `warden_security` - guard chain, rate limiter, pause gate, validation
//! - `warden_gateway` - allow-list operations and command dispatch
//! - `warden_discord` - slash commands, replies and audit log
//!
//! This crate wires them together: configuration, logging and the CLI.
//!
//! # Cargo Features
//!
//! - `observability` - export spans through OpenTelemetry's stdout exporter

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod cli;
mod config;
mod observability;

pub use app::{check_config, dump, run};
pub use cli::{Cli, Commands};
pub use config::{ConfigLoader, DiscordSettings, StoreSettings, WardenConfig};
pub use observability::{init_logging, LoggingConfig};
