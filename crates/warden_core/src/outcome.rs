//! Results of allow-list mutations.

use crate::Entry;

/// Why a mutation was refused after it passed the access checks.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RejectReason {
    /// Input failed validation
    #[display("Invalid {}: {}", field, reason)]
    Invalid {
        /// Offending field
        field: String,
        /// What was wrong with it
        reason: String,
    },
    /// The fresh read preceding the write failed
    #[display("store read failed")]
    StoreReadFailed,
    /// The full-document write failed; nothing was persisted
    #[display("store write failed")]
    StoreWriteFailed,
}

impl RejectReason {
    /// Build a validation rejection.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the rejection came from the store rather than from the input.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreReadFailed | Self::StoreWriteFailed)
    }
}

/// Result of an add-or-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new entry was appended
    Added(Entry),
    /// An existing entry was replaced in place
    Updated(Entry),
    /// Nothing was written
    Rejected(RejectReason),
}

/// Result of a removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The entry was removed and the document written back
    Removed(Entry),
    /// No entry had that uid; the store was not written
    NotFound,
    /// Nothing was written
    Rejected(RejectReason),
}
