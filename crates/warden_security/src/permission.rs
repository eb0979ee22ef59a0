//! Channel and owner checks.

use crate::{SecurityError, SecurityErrorKind, SecurityResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};
use warden_core::{ChannelId, UserId};

/// Who may use the bot, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// The only channel commands are served in
    pub allowed_channel: ChannelId,

    /// Users allowed to run owner-only commands
    #[serde(default)]
    pub owners: HashSet<UserId>,
}

impl PermissionConfig {
    /// Create a configuration for one channel and a set of owners.
    pub fn new(allowed_channel: ChannelId, owners: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            allowed_channel,
            owners: owners.into_iter().collect(),
        }
    }
}

/// Permission checker for channel and owner restrictions.
#[derive(Debug, Clone)]
pub struct PermissionChecker {
    config: PermissionConfig,
}

impl PermissionChecker {
    /// Create a new permission checker with the given configuration.
    pub fn new(config: PermissionConfig) -> Self {
        Self { config }
    }

    /// Check that a command arrived in the designated channel.
    #[instrument(skip(self), fields(channel = %channel))]
    pub fn check_channel(&self, channel: ChannelId) -> SecurityResult<()> {
        if channel != self.config.allowed_channel {
            debug!("Command outside designated channel");
            return Err(SecurityError::new(SecurityErrorKind::WrongChannel {
                channel: channel.0,
            }));
        }
        Ok(())
    }

    /// Check that `user` is one of the owners.
    #[instrument(skip(self), fields(user = %user))]
    pub fn check_owner(&self, command: &str, user: UserId) -> SecurityResult<()> {
        if !self.is_owner(user) {
            debug!("Caller is not an owner");
            return Err(SecurityError::new(SecurityErrorKind::PermissionDenied {
                command: command.to_string(),
                reason: "Command is restricted to owners".to_string(),
            }));
        }
        Ok(())
    }

    /// Whether `user` is one of the owners.
    pub fn is_owner(&self, user: UserId) -> bool {
        self.config.owners.contains(&user)
    }

    /// Get the permission configuration.
    pub fn config(&self) -> &PermissionConfig {
        &self.config
    }
}
