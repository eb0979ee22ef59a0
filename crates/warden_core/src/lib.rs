//! Core data types for the warden allow-list gateway.
//!
//! This crate provides the entry model stored in the remote document, the
//! Discord identity newtypes, and the outcome types returned by mutations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod entry;
mod ids;
mod outcome;

pub use document::{find_entry, remove_entry, upsert_entry, UpsertKind};
pub use entry::Entry;
pub use ids::{ChannelId, UserId};
pub use outcome::{RejectReason, RemoveOutcome, UpsertOutcome};
