//! Transport-neutral requests and responses.

use crate::Command;
use warden_core::{ChannelId, Entry, RemoveOutcome, UpsertOutcome, UserId};
use warden_security::SecurityError;

/// Who issued a request, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller {
    /// Issuing user
    pub user: UserId,
    /// Channel the request arrived in
    pub channel: ChannelId,
}

impl Caller {
    /// Describe a caller.
    pub fn new(user: UserId, channel: ChannelId) -> Self {
        Self { user, channel }
    }
}

/// A parsed command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `/help`
    Help,
    /// `/checkuid <uid>`
    CheckUid {
        /// Uid to look up
        uid: String,
    },
    /// `/viewuid <uid>`
    ViewUid {
        /// Uid to look up
        uid: String,
    },
    /// `/listuids`
    ListUids,
    /// `/adduid <uid> <year> <month> <day> <comment>`
    AddUid {
        /// Uid to add or update
        uid: String,
        /// Expiry year
        year: i64,
        /// Expiry month, 1-12
        month: i64,
        /// Expiry day of month
        day: i64,
        /// Free-form note
        comment: String,
    },
    /// `/removeuid <uid>`
    RemoveUid {
        /// Uid to remove
        uid: String,
    },
    /// `/pause`
    Pause,
    /// `/resume`
    Resume,
}

impl Request {
    /// The command this request invokes.
    pub fn command(&self) -> Command {
        match self {
            Self::Help => Command::Help,
            Self::CheckUid { .. } => Command::CheckUid,
            Self::ViewUid { .. } => Command::ViewUid,
            Self::ListUids => Command::ListUids,
            Self::AddUid { .. } => Command::AddUid,
            Self::RemoveUid { .. } => Command::RemoveUid,
            Self::Pause => Command::Pause,
            Self::Resume => Command::Resume,
        }
    }
}

/// What the gateway did with a request.
#[derive(Debug, Clone)]
pub enum Response {
    /// Static help text
    Help(String),
    /// Result of a single-uid lookup
    Lookup {
        /// Uid as requested, trimmed
        uid: String,
        /// Matching entry, if any
        entry: Option<Entry>,
    },
    /// Every entry, in document order
    Entries(Vec<Entry>),
    /// Result of `/adduid`
    Upserted(UpsertOutcome),
    /// Result of `/removeuid`
    Removed(RemoveOutcome),
    /// The pause gate was set
    PauseChanged {
        /// New state
        paused: bool,
        /// State before the call
        previous: bool,
    },
    /// A guard refused the request; no operation ran
    Denied(SecurityError),
}

impl Response {
    /// Whether the request reached its operation and the operation succeeded.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Help(_) | Self::Entries(_) | Self::PauseChanged { .. } => true,
            Self::Lookup { entry, .. } => entry.is_some(),
            Self::Upserted(outcome) => !matches!(outcome, UpsertOutcome::Rejected(_)),
            Self::Removed(outcome) => matches!(outcome, RemoveOutcome::Removed(_)),
            Self::Denied(_) => false,
        }
    }
}
