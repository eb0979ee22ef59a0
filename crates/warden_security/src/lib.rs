//! Access control for warden commands.
//!
//! Every command passes an ordered chain of guards before it reaches the
//! allow-list. The first guard to object ends the chain.
//!
//! # Layers
//!
//! 1. **Channel** - commands are only served in one designated channel
//! 2. **Owner** - privileged commands require a configured owner id
//! 3. **Pause** - mutating commands are refused while the gate is closed
//! 4. **Rate limit** - per-user sliding window on rate-limited commands
//!
//! Input validation runs after the chain, inside the gateway.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod guard;
mod pause;
mod permission;
mod rate_limit;
mod validation;

pub use error::{SecurityError, SecurityErrorKind, SecurityResult};
pub use guard::{
    AccessPolicy, ChannelGuard, Guard, GuardChain, Invocation, OwnerGuard, PauseGuard,
    RateLimitGuard,
};
pub use pause::{PauseGate, PauseState};
pub use permission::{PermissionChecker, PermissionConfig};
pub use rate_limit::{RateLimit, RateLimiter};
pub use validation::{EntryValidator, ValidationPolicy};
