//! Layered configuration for the warden binary.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `~/.config/warden/warden.toml` (platform config dir), optional
//! 3. `./warden.toml`, optional
//! 4. An explicit `--config <path>`, required when given
//! 5. Legacy variables (`JSONBIN_URL`, `DISCORD_BOT_TOKEN`, ...)
//! 6. `WARDEN_*` variables, `__` separating sections (`WARDEN_STORE__URL`)
//!
//! # Example
//!
//! ```toml
//! [store]
//! url = "https://api.jsonbin.io/v3/b/<bin id>"
//! api_key = "<master key>"
//!
//! [discord]
//! token = "<bot token>"
//! allowed_channel = 123456789012345678
//! owners = [234567890123456789]
//! log_channel = 345678901234567890
//!
//! [rate_limit]
//! max_requests = 10
//! window_secs = 60
//! ```

use config::{Config, Environment, File, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};
use warden_cache::CacheConfig;
use warden_core::{ChannelId, UserId};
use warden_error::{ConfigError, WardenResult};
use warden_gateway::{GatewaySettings, GatewaySettingsBuilder};
use warden_security::{PermissionConfig, RateLimit, ValidationPolicy};

const FILE_STEM: &str = "warden";
const ENV_PREFIX: &str = "WARDEN";

/// Remote document store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Full URL of the document
    #[serde(default)]
    pub url: String,
    /// Master key sent with every request
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl StoreSettings {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Discord bot settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordSettings {
    /// Bot token
    #[serde(default)]
    pub token: String,
    /// The only channel commands are served in
    #[serde(default)]
    pub allowed_channel: u64,
    /// Users allowed to run owner-only commands
    #[serde(default)]
    pub owners: Vec<u64>,
    /// Audit channel; absent or zero disables the audit log
    #[serde(default)]
    pub log_channel: Option<u64>,
}

/// Everything the binary reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Remote document store
    #[serde(default)]
    pub store: StoreSettings,
    /// Discord connection and access
    #[serde(default)]
    pub discord: DiscordSettings,
    /// Snapshot cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Per-user limit on `/adduid`
    #[serde(default)]
    pub rate_limit: RateLimit,
    /// Input limits for new entries
    #[serde(default)]
    pub validation: ValidationPolicy,
}

/// Variable names used by earlier deployments of the bot.
const LEGACY_VARS: [(&str, &str); 6] = [
    ("JSONBIN_URL", "store.url"),
    ("JSONBIN_API_KEY", "store.api_key"),
    ("DISCORD_BOT_TOKEN", "discord.token"),
    ("ALLOWED_CHANNEL", "discord.allowed_channel"),
    ("LOG_CHANNEL_ID", "discord.log_channel"),
    ("DEV_DISCORD_ID", "discord.owners"),
];

/// Maps the legacy variable names onto configuration keys.
#[derive(Debug, Clone)]
struct LegacyEnvironment {
    vars: HashMap<String, String>,
}

impl Source for LegacyEnvironment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        let origin = "legacy environment".to_string();
        let mut map = Map::new();

        for (var, key) in LEGACY_VARS {
            let Some(raw) = self.vars.get(var).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
                continue;
            };
            let kind = match key {
                "store.url" | "store.api_key" | "discord.token" => ValueKind::String(raw.to_string()),
                _ => {
                    let id = raw.parse::<u64>().map_err(|e| {
                        config::ConfigError::Message(format!("{} must be a numeric id: {}", var, e))
                    })?;
                    let id = ValueKind::U64(id);
                    if key == "discord.owners" {
                        ValueKind::Array(vec![Value::new(Some(&origin), id)])
                    } else {
                        id
                    }
                }
            };
            map.insert(key.to_string(), Value::new(Some(&origin), kind));
        }

        Ok(map)
    }
}

/// Where to look for configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    search_default_paths: bool,
    vars: HashMap<String, String>,
    inline: Option<String>,
}

impl ConfigLoader {
    /// The standard sources: default paths and the process environment.
    pub fn new() -> Self {
        Self {
            file: None,
            search_default_paths: true,
            vars: std::env::vars().collect(),
            inline: None,
        }
    }

    /// No sources beyond the defaults. Tests add sources explicitly.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read `path` as well; it must exist.
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file = path;
        self
    }

    /// Use `vars` in place of the process environment.
    pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Layer a TOML document over the files, below the environment.
    pub fn with_toml(mut self, toml: impl Into<String>) -> Self {
        self.inline = Some(toml.into());
        self
    }

    /// Build the merged configuration.
    ///
    /// Required settings are not checked here; see
    /// [`WardenConfig::require_store`] and [`WardenConfig::require_discord`].
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    #[instrument(skip(self), fields(file = ?self.file))]
    pub fn load(self) -> WardenResult<WardenConfig> {
        let mut builder = Config::builder();

        if self.search_default_paths {
            if let Some(dir) = dirs::config_dir() {
                let user_config = dir.join(FILE_STEM).join(format!("{}.toml", FILE_STEM));
                debug!(path = %user_config.display(), "Searching user config");
                builder = builder.add_source(File::from(user_config).required(false));
            }
            builder = builder.add_source(File::with_name(FILE_STEM).required(false));
        }

        if let Some(path) = &self.file {
            builder = builder.add_source(File::from(path.as_path()));
        }

        if let Some(toml) = &self.inline {
            builder = builder.add_source(File::from_str(toml, config::FileFormat::Toml));
        }

        let env_vars: Map<String, String> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        builder = builder
            .add_source(LegacyEnvironment { vars: self.vars })
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("discord.owners")
                    .source(Some(env_vars)),
            );

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }
}

fn missing(fields: Vec<&str>) -> WardenResult<()> {
    if fields.is_empty() {
        return Ok(());
    }
    Err(ConfigError::new(format!(
        "Missing required settings: {}",
        fields.join(", ")
    ))
    .into())
}

impl WardenConfig {
    /// Load from the standard sources, plus `file` when given.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn load(file: Option<PathBuf>) -> WardenResult<Self> {
        ConfigLoader::new().with_file(file).load()
    }

    /// Check the settings needed to reach the store.
    ///
    /// # Errors
    ///
    /// Names every missing setting.
    pub fn require_store(&self) -> WardenResult<()> {
        let mut fields = Vec::new();
        if self.store.url.trim().is_empty() {
            fields.push("store.url");
        }
        if self.store.api_key.trim().is_empty() {
            fields.push("store.api_key");
        }
        missing(fields)
    }

    /// Check every setting needed to run the bot.
    ///
    /// # Errors
    ///
    /// Names every missing setting.
    pub fn require_discord(&self) -> WardenResult<()> {
        let mut fields = Vec::new();
        if self.store.url.trim().is_empty() {
            fields.push("store.url");
        }
        if self.store.api_key.trim().is_empty() {
            fields.push("store.api_key");
        }
        if self.discord.token.trim().is_empty() {
            fields.push("discord.token");
        }
        if self.discord.allowed_channel == 0 {
            fields.push("discord.allowed_channel");
        }
        if !self.discord.owners.iter().any(|id| *id != 0) {
            fields.push("discord.owners");
        }
        missing(fields)
    }

    /// Channel and owner configuration.
    pub fn permissions(&self) -> PermissionConfig {
        PermissionConfig::new(
            ChannelId(self.discord.allowed_channel),
            self.discord
                .owners
                .iter()
                .copied()
                .filter(|id| *id != 0)
                .map(UserId),
        )
    }

    /// Settings for [`warden_gateway::Gateway::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be assembled.
    pub fn gateway_settings(&self) -> WardenResult<GatewaySettings> {
        GatewaySettingsBuilder::default()
            .cache(self.cache.clone())
            .rate_limit(self.rate_limit.clone())
            .validation(self.validation.clone())
            .permissions(self.permissions())
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid gateway settings: {}", e)).into())
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Human-readable summary with secrets hidden.
impl fmt::Display for WardenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[store]")?;
        writeln!(f, "url = {:?}", self.store.url)?;
        writeln!(f, "api_key = {}", redact(&self.store.api_key))?;
        writeln!(f, "timeout_secs = {}", self.store.timeout_secs)?;
        writeln!(f, "[discord]")?;
        writeln!(f, "token = {}", redact(&self.discord.token))?;
        writeln!(f, "allowed_channel = {}", self.discord.allowed_channel)?;
        writeln!(f, "owners = {:?}", self.discord.owners)?;
        match self.discord.log_channel {
            Some(id) => writeln!(f, "log_channel = {}", id)?,
            None => writeln!(f, "log_channel = <unset>")?,
        }
        writeln!(f, "[cache]")?;
        writeln!(f, "ttl_secs = {}", self.cache.ttl_secs())?;
        writeln!(f, "[rate_limit]")?;
        writeln!(f, "max_requests = {}", self.rate_limit.max_requests())?;
        writeln!(f, "window_secs = {}", self.rate_limit.window_secs())?;
        writeln!(f, "[validation]")?;
        writeln!(f, "min_year = {}", self.validation.min_year())?;
        write!(f, "max_year = {}", self.validation.max_year())
    }
}
