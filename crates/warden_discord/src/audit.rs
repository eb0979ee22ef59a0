//! Audit log of allow-list changes.

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId as DiscordChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, Http, Timestamp,
};
use tracing::{debug, instrument, warn};
use warden_core::{Entry, RemoveOutcome, UpsertOutcome};
use warden_gateway::Response;

const FOOTER: &str = "Whitelist System";

/// The user who triggered an audited change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Account id
    pub id: u64,
    /// Account name
    pub name: String,
}

/// A change worth recording in the audit channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// An entry was added or updated
    Added {
        /// Entry as written
        entry: Entry,
        /// Who wrote it
        actor: Actor,
    },
    /// An entry was removed
    Removed {
        /// Removed uid
        uid: String,
        /// Who removed it
        actor: Actor,
    },
    /// Mutations were paused
    Paused {
        /// Who paused
        actor: Actor,
    },
    /// Mutations were resumed
    Resumed {
        /// Who resumed
        actor: Actor,
    },
}

fn code(value: impl std::fmt::Display) -> String {
    format!("`{}`", value)
}

impl AuditEvent {
    /// The event recorded for `response`, if it changed anything.
    pub fn from_response(actor: Actor, response: &Response) -> Option<Self> {
        match response {
            Response::Upserted(UpsertOutcome::Added(entry) | UpsertOutcome::Updated(entry)) => {
                Some(Self::Added {
                    entry: entry.clone(),
                    actor,
                })
            }
            Response::Removed(RemoveOutcome::Removed(entry)) => Some(Self::Removed {
                uid: entry.uid.clone(),
                actor,
            }),
            Response::PauseChanged { paused: true, .. } => Some(Self::Paused { actor }),
            Response::PauseChanged { paused: false, .. } => Some(Self::Resumed { actor }),
            _ => None,
        }
    }

    /// Embed title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Added { .. } => "🟢 UID ADDED",
            Self::Removed { .. } => "🔴 UID REMOVED",
            Self::Paused { .. } => "⏸️ SYSTEM PAUSED",
            Self::Resumed { .. } => "▶️ SYSTEM RESUMED",
        }
    }

    /// Embed colour as `0xRRGGBB`.
    pub fn colour(&self) -> u32 {
        match self {
            Self::Added { .. } | Self::Resumed { .. } => 0x00ff00,
            Self::Removed { .. } => 0xff0000,
            Self::Paused { .. } => 0xffff00,
        }
    }

    /// Who triggered the event.
    pub fn actor(&self) -> &Actor {
        match self {
            Self::Added { actor, .. }
            | Self::Removed { actor, .. }
            | Self::Paused { actor }
            | Self::Resumed { actor } => actor,
        }
    }

    /// Inline embed fields, in display order.
    pub fn fields(&self, at: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let actor = self.actor();
        let by = format!("{}\n({})", code(&actor.name), code(actor.id));
        let mut fields = match self {
            Self::Added { entry, .. } => vec![
                ("UID", code(&entry.uid)),
                ("Expiry", code(entry.expiry_date)),
                ("Comment", code(&entry.comment)),
                ("Added By", by),
            ],
            Self::Removed { uid, .. } => vec![("UID", code(uid)), ("Removed By", by)],
            Self::Paused { .. } | Self::Resumed { .. } => vec![("Action By", by)],
        };
        fields.push(("Timestamp", code(at.format("%Y-%m-%d %H:%M:%S"))));
        fields
    }

    /// Build the embed posted to the audit channel.
    pub fn embed(&self, at: DateTime<Utc>) -> CreateEmbed {
        let embed = self.fields(at).into_iter().fold(
            CreateEmbed::new()
                .title(self.title())
                .colour(self.colour())
                .footer(CreateEmbedFooter::new(FOOTER)),
            |embed, (name, value)| embed.field(name, value, true),
        );
        match Timestamp::from_unix_timestamp(at.timestamp()) {
            Ok(timestamp) => embed.timestamp(timestamp),
            Err(_) => embed,
        }
    }
}

/// Posts audit events to a channel, when one is configured.
///
/// Delivery failures are logged and otherwise ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLog {
    channel: Option<DiscordChannelId>,
}

impl AuditLog {
    /// Log to `channel`, or nowhere when `None` or zero.
    pub fn new(channel: Option<u64>) -> Self {
        Self {
            channel: channel.filter(|id| *id != 0).map(DiscordChannelId::new),
        }
    }

    /// Whether a channel is configured.
    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    /// Post the embed for `event`.
    #[instrument(skip(self, http, event), fields(title = event.title()))]
    pub async fn record(&self, http: &Http, event: &AuditEvent) {
        let Some(channel) = self.channel else {
            debug!("No audit channel configured");
            return;
        };
        let message = CreateMessage::new().embed(event.embed(Utc::now()));
        if let Err(e) = channel.send_message(http, message).await {
            warn!(channel = %channel, error = %e, "Failed to post audit event");
        }
    }

    /// Post the startup line.
    #[instrument(skip(self, http))]
    pub async fn started(&self, http: &Http) {
        let Some(channel) = self.channel else {
            return;
        };
        let line = format!(
            "{} 🟢 **Bot Started Successfully**",
            code(Utc::now().format("%H:%M:%S"))
        );
        if let Err(e) = channel.say(http, line).await {
            warn!(channel = %channel, error = %e, "Failed to post startup line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn actor() -> Actor {
        Actor {
            id: 42,
            name: "alice".into(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_add_fields() {
        let entry = Entry::new("abc123", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), "test");
        let event = AuditEvent::Added {
            entry,
            actor: actor(),
        };

        assert_eq!(
            event.fields(at()),
            vec![
                ("UID", "`abc123`".to_string()),
                ("Expiry", "`2025-01-01`".to_string()),
                ("Comment", "`test`".to_string()),
                ("Added By", "`alice`\n(`42`)".to_string()),
                ("Timestamp", "`2025-03-04 05:06:07`".to_string()),
            ]
        );
        assert_eq!(event.colour(), 0x00ff00);
    }

    #[test]
    fn test_pause_fields() {
        let event = AuditEvent::Paused { actor: actor() };
        let names: Vec<_> = event.fields(at()).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Action By", "Timestamp"]);
        assert_eq!(event.title(), "⏸️ SYSTEM PAUSED");
    }

    #[test]
    fn test_zero_channel_disables_log() {
        assert!(!AuditLog::new(Some(0)).is_enabled());
        assert!(!AuditLog::new(None).is_enabled());
        assert!(AuditLog::new(Some(9)).is_enabled());
    }
}
