//! Serenity event handler.

use crate::{parse_request, render, slash_commands, Actor, ArgValue, AuditEvent, AuditLog, CommandArgs, Reply};
use serenity::all::{
    Command as SlashCommand, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, Interaction, Ready,
    ResolvedValue,
};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use warden_core::{ChannelId, UserId};
use warden_error::{DiscordError, DiscordErrorKind, DiscordResult};
use warden_gateway::{Caller, Gateway};
use warden_store::DocumentStore;

/// Routes slash-command interactions to the gateway.
pub struct WardenHandler<S> {
    gateway: Arc<Gateway<S>>,
    audit: AuditLog,
}

impl<S: DocumentStore + 'static> WardenHandler<S> {
    /// Create a handler over `gateway`.
    pub fn new(gateway: Arc<Gateway<S>>, audit: AuditLog) -> Self {
        Self { gateway, audit }
    }

    /// Gateway intents the handler needs. Slash commands arrive without any
    /// privileged intent.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    fn arguments(command: &CommandInteraction) -> CommandArgs {
        command
            .data
            .options()
            .into_iter()
            .filter_map(|option| {
                let value = match option.value {
                    ResolvedValue::String(text) => ArgValue::Text(text.to_string()),
                    ResolvedValue::Integer(number) => ArgValue::Integer(number),
                    other => {
                        debug!(option = option.name, value = ?other, "Ignoring unsupported option");
                        return None;
                    }
                };
                Some((option.name.to_string(), value))
            })
            .collect()
    }

    #[instrument(
        skip(self, ctx, command),
        fields(command = %command.data.name, user = %command.user.id, channel = %command.channel_id)
    )]
    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) -> DiscordResult<()> {
        let caller = Caller::new(
            UserId(command.user.id.get()),
            ChannelId(command.channel_id.get()),
        );
        let args = Self::arguments(command);

        let (reply, event) = match parse_request(&command.data.name, &args) {
            Ok(request) => {
                let kind = request.command();
                let response = self.gateway.dispatch(caller, request).await;
                let actor = Actor {
                    id: command.user.id.get(),
                    name: command.user.name.clone(),
                };
                (render(kind, &response), AuditEvent::from_response(actor, &response))
            }
            Err(e) => {
                warn!(error = %e, "Malformed interaction");
                (Reply::ephemeral(format!("❌ {}.", e.kind)), None)
            }
        };

        let message = CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        command
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(|e| DiscordError::new(DiscordErrorKind::InteractionFailed(e.to_string())))?;

        if let Some(event) = event {
            self.audit.record(&ctx.http, &event).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DocumentStore + 'static> EventHandler for WardenHandler<S> {
    /// Register the slash commands and announce startup.
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );

        match SlashCommand::set_global_commands(&ctx.http, slash_commands()).await {
            Ok(registered) => info!(count = registered.len(), "Slash commands registered"),
            Err(e) => {
                let e = DiscordError::new(DiscordErrorKind::RegistrationFailed(e.to_string()));
                error!(error = %e, "Failed to register slash commands");
                return;
            }
        }

        self.audit.started(&ctx.http).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if let Err(e) = self.handle_command(&ctx, &command).await {
            error!(error = %e, "Failed to answer interaction");
        }
    }
}
