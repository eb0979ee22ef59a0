//! Command implementations.

use crate::WardenConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use warden_core::Entry;
use warden_discord::{AuditLog, WardenBot, WardenHandler};
use warden_error::{ConfigError, JsonError, WardenResult};
use warden_gateway::Gateway;
use warden_store::{decode_document, DocumentStore, InMemoryStore, JsonBinStore};

fn remote_store(config: &WardenConfig) -> WardenResult<JsonBinStore> {
    Ok(JsonBinStore::new(
        &config.store.url,
        &config.store.api_key,
        config.store.timeout(),
    )?)
}

/// Connect to Discord and serve commands until interrupted.
///
/// # Errors
///
/// Returns an error on missing settings or when the client cannot start.
#[instrument(skip_all)]
pub async fn run(config: WardenConfig) -> WardenResult<()> {
    config.require_discord()?;

    let gateway = Arc::new(Gateway::new(remote_store(&config)?, config.gateway_settings()?));

    // Warm the cache so the first command does not wait on the store.
    let entries = gateway.list_all().await.len();
    info!(entries, "Allow-list loaded");

    let handler = WardenHandler::new(gateway, AuditLog::new(config.discord.log_channel));
    let mut bot = WardenBot::new(&config.discord.token, handler).await?;

    tokio::select! {
        result = bot.start() => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupt received"),
    }
    bot.shutdown().await;
    Ok(())
}

async fn fetch_all<S: DocumentStore>(store: S, config: &WardenConfig) -> WardenResult<Vec<Entry>> {
    let gateway = Gateway::new(store, config.gateway_settings()?);
    Ok(gateway.cache().refresh().await?)
}

/// Load a saved copy of the document into an in-memory store.
///
/// The file goes through the same decoding as a remote fetch, so an export
/// of a bin can be checked for bad entries without network access.
fn exported_store(path: &Path) -> WardenResult<InMemoryStore> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let payload = serde_json::from_str(&raw)
        .map_err(|e| JsonError::new(format!("{} is not JSON: {}", path.display(), e)))?;
    Ok(InMemoryStore::with_entries(decode_document(payload)?))
}

/// Read the whole allow-list and render it as pretty JSON.
///
/// With `from_file` the document is read from a local export instead of the
/// remote store. Unlike the bot's reads this does not fall back to cached or
/// empty data: a store failure is an error.
///
/// # Errors
///
/// Returns an error on missing store settings, an unreadable export, or a
/// failed read.
#[instrument(skip(config))]
pub async fn dump(config: &WardenConfig, from_file: Option<&Path>) -> WardenResult<String> {
    let entries = match from_file {
        Some(path) => fetch_all(exported_store(path)?, config).await?,
        None => {
            config.require_store()?;
            fetch_all(remote_store(config)?, config).await?
        }
    };
    info!(entries = entries.len(), "Allow-list fetched");

    serde_json::to_string_pretty(&entries).map_err(|e| JsonError::new(e.to_string()).into())
}

/// Check that the bot could start, and summarize the settings.
///
/// # Errors
///
/// Names every missing required setting.
pub fn check_config(config: &WardenConfig) -> WardenResult<String> {
    config.require_discord()?;
    config.gateway_settings()?;
    Ok(config.to_string())
}
