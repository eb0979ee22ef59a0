//! Ordered guard chain run before every command.

use crate::{PauseGate, PermissionChecker, RateLimiter, SecurityError, SecurityErrorKind, SecurityResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use warden_core::{ChannelId, UserId};

/// Which checks a command is subject to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessPolicy {
    /// Only owners may run it
    pub owner_only: bool,
    /// It writes to the allow-list and is refused while paused
    pub mutating: bool,
    /// It counts against the caller's rate limit
    pub rate_limited: bool,
}

/// One command invocation as seen by the guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Who issued the command
    pub user: UserId,
    /// Where it was issued
    pub channel: ChannelId,
    /// Command name, for logs and errors
    pub command: String,
    /// Checks that apply
    pub policy: AccessPolicy,
}

impl Invocation {
    /// Describe an invocation.
    pub fn new(user: UserId, channel: ChannelId, command: impl Into<String>, policy: AccessPolicy) -> Self {
        Self {
            user,
            channel,
            command: command.into(),
            policy,
        }
    }
}

/// A single admission check.
///
/// A guard either lets the invocation proceed or ends the chain with a
/// rejection. Guards that do not apply to an invocation's policy proceed.
pub trait Guard: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Check the invocation.
    fn check(&self, invocation: &Invocation) -> SecurityResult<()>;
}

/// Refuses commands outside the designated channel.
pub struct ChannelGuard {
    permissions: Arc<PermissionChecker>,
}

impl ChannelGuard {
    /// Create a channel guard.
    pub fn new(permissions: Arc<PermissionChecker>) -> Self {
        Self { permissions }
    }
}

impl Guard for ChannelGuard {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn check(&self, invocation: &Invocation) -> SecurityResult<()> {
        self.permissions.check_channel(invocation.channel)
    }
}

/// Refuses owner-only commands from everyone else.
pub struct OwnerGuard {
    permissions: Arc<PermissionChecker>,
}

impl OwnerGuard {
    /// Create an owner guard.
    pub fn new(permissions: Arc<PermissionChecker>) -> Self {
        Self { permissions }
    }
}

impl Guard for OwnerGuard {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn check(&self, invocation: &Invocation) -> SecurityResult<()> {
        if !invocation.policy.owner_only {
            return Ok(());
        }
        self.permissions
            .check_owner(&invocation.command, invocation.user)
    }
}

/// Refuses mutating commands while the gate is closed, owners included.
pub struct PauseGuard {
    gate: Arc<PauseGate>,
}

impl PauseGuard {
    /// Create a pause guard.
    pub fn new(gate: Arc<PauseGate>) -> Self {
        Self { gate }
    }
}

impl Guard for PauseGuard {
    fn name(&self) -> &'static str {
        "pause"
    }

    fn check(&self, invocation: &Invocation) -> SecurityResult<()> {
        if invocation.policy.mutating && self.gate.is_paused() {
            return Err(SecurityError::new(SecurityErrorKind::Paused {
                command: invocation.command.clone(),
            }));
        }
        Ok(())
    }
}

/// Counts rate-limited commands against the caller's window.
pub struct RateLimitGuard {
    limiter: Arc<RateLimiter>,
}

impl RateLimitGuard {
    /// Create a rate-limit guard.
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl Guard for RateLimitGuard {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    fn check(&self, invocation: &Invocation) -> SecurityResult<()> {
        if !invocation.policy.rate_limited {
            return Ok(());
        }
        self.limiter.check(invocation.user)
    }
}

/// Guards evaluated in order; the first rejection wins.
///
/// Guards after a rejection are not consulted, so a refused command never
/// consumes rate-limit budget unless it reached the rate-limit guard.
#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: channel, owner, pause, rate limit.
    pub fn standard(
        permissions: Arc<PermissionChecker>,
        gate: Arc<PauseGate>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self::new()
            .with(ChannelGuard::new(permissions.clone()))
            .with(OwnerGuard::new(permissions))
            .with(PauseGuard::new(gate))
            .with(RateLimitGuard::new(limiter))
    }

    /// Append a guard.
    pub fn with(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Names of the guards, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|guard| guard.name()).collect()
    }

    /// Run every guard in order.
    ///
    /// # Errors
    ///
    /// Returns the first guard's rejection.
    #[instrument(skip(self, invocation), fields(command = %invocation.command, user = %invocation.user))]
    pub fn run(&self, invocation: &Invocation) -> SecurityResult<()> {
        for guard in &self.guards {
            if let Err(e) = guard.check(invocation) {
                info!(guard = guard.name(), error = %e.kind, "Command rejected");
                return Err(e);
            }
            debug!(guard = guard.name(), "Guard passed");
        }
        Ok(())
    }
}
