//! Discord client setup and lifecycle.

use crate::WardenHandler;
use serenity::Client;
use tracing::{info, instrument};
use warden_error::{DiscordError, DiscordErrorKind, DiscordResult};
use warden_store::DocumentStore;

/// The connected bot.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use warden_core::{ChannelId, UserId};
/// use warden_discord::{AuditLog, WardenBot, WardenHandler};
/// use warden_gateway::{Gateway, GatewaySettingsBuilder};
/// use warden_security::PermissionConfig;
/// use warden_store::InMemoryStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = GatewaySettingsBuilder::default()
///         .permissions(PermissionConfig::new(ChannelId(1), [UserId(2)]))
///         .build()?;
///     let gateway = Arc::new(Gateway::new(InMemoryStore::new(), settings));
///     let handler = WardenHandler::new(gateway, AuditLog::new(None));
///
///     let mut bot = WardenBot::new("token", handler).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct WardenBot {
    client: Client,
}

impl WardenBot {
    /// Build the client around `handler`.
    ///
    /// # Errors
    /// Returns an error if the token is malformed or the client fails to build.
    #[instrument(skip(token, handler), fields(token_len = token.len()))]
    pub async fn new<S: DocumentStore + 'static>(
        token: &str,
        handler: WardenHandler<S>,
    ) -> DiscordResult<Self> {
        let intents = WardenHandler::<S>::intents();
        info!(?intents, "Building Serenity client");

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Connect and serve until the connection ends.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or hits a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> DiscordResult<()> {
        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::SerenityError(format!(
                "Client error: {}",
                e
            )))
        })
    }

    /// Disconnect every shard.
    pub async fn shutdown(&self) {
        info!("Shutting down Discord bot");
        self.client.shard_manager.shutdown_all().await;
    }
}
