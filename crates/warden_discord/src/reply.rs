//! Rendering gateway responses as chat replies.

use tracing::warn;
use warden_core::{Entry, RejectReason, RemoveOutcome, UpsertOutcome};
use warden_gateway::{Command, Response};
use warden_security::SecurityErrorKind;

/// Longest message the chat service accepts, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

const DATABASE_ERROR: &str = "❌ Database connection error.";

/// Text of a reply and whether only the caller sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message body
    pub content: String,
    /// Visible to the caller only
    pub ephemeral: bool,
}

impl Reply {
    /// A reply everyone in the channel sees.
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A reply only the caller sees.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

fn json_block(entries: &[Entry]) -> String {
    match serde_json::to_string_pretty(entries) {
        Ok(json) => format!("```json\n{}\n```", json),
        Err(e) => {
            warn!(error = %e, "Failed to encode entries");
            DATABASE_ERROR.to_string()
        }
    }
}

fn listing(entries: &[Entry], shown: usize) -> String {
    let block = json_block(&entries[..shown]);
    match entries.len() - shown {
        0 => block,
        hidden => format!("{}\n…and {} more entries.", block, hidden),
    }
}

/// The whole list as a JSON block, cut short to fit one message.
fn entries_block(entries: &[Entry]) -> String {
    let fits = |shown: usize| listing(entries, shown).chars().count() <= MESSAGE_LIMIT;
    if fits(entries.len()) {
        return listing(entries, entries.len());
    }

    // Rendered length grows with the number shown; find the longest prefix that fits.
    let (mut lo, mut hi) = (0, entries.len());
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    listing(entries, lo)
}

fn box_view(entry: &Entry) -> String {
    let view = |comment: &str| {
        format!(
            "```\n📦 WHITELIST ENTRY\n──────────────────────────\nUID:        {}\nExpiry:     {}\nComment:    {}\n```",
            entry.uid,
            entry.expiry_date.format("%d - %m - %Y"),
            comment
        )
    };

    let full = view(&entry.comment);
    let overflow = full.chars().count().saturating_sub(MESSAGE_LIMIT);
    if overflow == 0 {
        return full;
    }

    // Shorten the comment by the overflow, one character going to the ellipsis.
    let keep = entry.comment.chars().count().saturating_sub(overflow + 1);
    let shortened: String = entry.comment.chars().take(keep).collect();
    view(&format!("{}…", shortened))
}

fn rejection(reason: &RejectReason) -> Reply {
    match reason {
        RejectReason::Invalid { field, reason } => {
            Reply::ephemeral(format!("❌ Invalid {}: {}.", field, reason))
        }
        RejectReason::StoreReadFailed => Reply::ephemeral(DATABASE_ERROR),
        RejectReason::StoreWriteFailed => Reply::ephemeral("❌ Error saving UID to database."),
    }
}

/// Render the gateway's response to `command`.
///
/// # Examples
///
/// ```
/// use warden_discord::render;
/// use warden_gateway::{Command, Response};
///
/// let reply = render(Command::CheckUid, &Response::Lookup { uid: "x".into(), entry: None });
/// assert_eq!(reply.content, "UID not found.");
/// assert!(!reply.ephemeral);
/// ```
pub fn render(command: Command, response: &Response) -> Reply {
    match response {
        Response::Help(text) => Reply::public(text.as_str()),
        Response::Lookup { entry: None, .. } => Reply::public("UID not found."),
        Response::Lookup {
            entry: Some(entry), ..
        } => match command {
            Command::ViewUid => Reply::public(box_view(entry)),
            _ => Reply::public(entries_block(std::slice::from_ref(entry))),
        },
        Response::Entries(entries) => Reply::public(entries_block(entries)),
        Response::Upserted(UpsertOutcome::Added(entry)) => {
            Reply::ephemeral(format!("🟢 UID **{}** added.", entry.uid))
        }
        Response::Upserted(UpsertOutcome::Updated(entry)) => {
            Reply::ephemeral(format!("🟡 UID **{}** updated.", entry.uid))
        }
        Response::Upserted(UpsertOutcome::Rejected(reason)) => rejection(reason),
        Response::Removed(RemoveOutcome::Removed(entry)) => {
            Reply::ephemeral(format!("🔴 UID **{}** removed.", entry.uid))
        }
        Response::Removed(RemoveOutcome::NotFound) => {
            Reply::ephemeral("❌ UID not found or error removing.")
        }
        Response::Removed(RemoveOutcome::Rejected(reason)) => rejection(reason),
        Response::PauseChanged { paused: true, .. } => Reply::ephemeral("⏸️ Whitelist PAUSED."),
        Response::PauseChanged { paused: false, .. } => Reply::ephemeral("▶️ Whitelist RESUMED."),
        Response::Denied(e) => {
            let marker = match e.kind {
                SecurityErrorKind::Paused { .. } => "⚠️",
                _ => "❌",
            };
            Reply::ephemeral(format!("{} {}", marker, e.user_message()))
        }
    }
}
