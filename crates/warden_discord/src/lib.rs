//! Discord transport for warden.
//!
//! Registers one global slash command per gateway command, turns each
//! interaction into a gateway [`Request`](warden_gateway::Request), and
//! replies with the rendered [`Response`](warden_gateway::Response).
//! Successful mutations and pause changes are echoed to an optional audit
//! channel as embeds.
//!
//! Parsing and rendering are plain functions over owned data so they can be
//! tested without a Discord connection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod args;
mod audit;
mod client;
mod commands;
mod handler;
mod reply;

pub use args::{parse_request, ArgValue, CommandArgs};
pub use audit::{Actor, AuditEvent, AuditLog};
pub use client::WardenBot;
pub use commands::{option_specs, slash_commands, OptionKind, OptionSpec};
pub use handler::WardenHandler;
pub use reply::{render, Reply, MESSAGE_LIMIT};
