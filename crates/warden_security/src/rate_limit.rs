//! Per-user sliding-window rate limiting.

use crate::{SecurityError, SecurityErrorKind, SecurityResult};
use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};
use warden_core::UserId;

/// Rate limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RateLimit {
    /// Calls admitted per window
    #[serde(default = "default_max_requests")]
    max_requests: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    window_secs: u64,
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60
}

impl RateLimit {
    /// Create a new rate limit.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    /// Window length as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::new(default_max_requests(), default_window_secs())
    }
}

/// Sliding-window admission counter keyed by user.
///
/// Each user has the timestamps of their admitted calls inside the trailing
/// window. A timestamp leaves the window once it is strictly older than the
/// window length. Old timestamps are pruned lazily on the next call for that user.
/// Refused attempts are not recorded. State is in-memory only.
///
/// # Examples
///
/// ```
/// use warden_core::UserId;
/// use warden_security::{RateLimit, RateLimiter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = RateLimiter::new(RateLimit::new(2, 60));
/// assert!(limiter.allow(UserId(7)));
/// assert!(limiter.allow(UserId(7)));
/// assert!(!limiter.allow(UserId(7)));
/// assert!(limiter.allow(UserId(8)));
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    limit: RateLimit,
    windows: Mutex<HashMap<UserId, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admit and record a call for `user`, or refuse it.
    pub fn allow(&self, user: UserId) -> bool {
        self.try_acquire(user).is_ok()
    }

    /// Like [`RateLimiter::allow`], but a refusal carries the retry delay.
    ///
    /// # Errors
    ///
    /// Returns `RateLimitExceeded` when the user already has the maximum number
    /// of calls inside the window.
    #[instrument(skip(self), fields(user = %user))]
    pub fn check(&self, user: UserId) -> SecurityResult<()> {
        self.try_acquire(user).map_err(|retry_after| {
            debug!(retry_after_secs = retry_after.as_secs(), "Rate limit exceeded");
            SecurityError::new(SecurityErrorKind::RateLimitExceeded {
                user: user.0,
                limit: self.limit.max_requests,
                window_secs: self.limit.window_secs,
                retry_after_secs: retry_after.as_secs().max(1),
            })
        })
    }

    /// Calls `user` could still make right now.
    pub fn remaining(&self, user: UserId) -> u32 {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let used = windows
            .get_mut(&user)
            .map(|window| {
                self.prune(window, now);
                window.len()
            })
            .unwrap_or(0);
        (self.limit.max_requests as usize).saturating_sub(used) as u32
    }

    /// Get the rate limit configuration.
    pub fn limit(&self) -> &RateLimit {
        &self.limit
    }

    fn try_acquire(&self, user: UserId) -> Result<(), Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let window = windows.entry(user).or_default();
        self.prune(window, now);

        if window.len() >= self.limit.max_requests as usize {
            let retry_after = window
                .front()
                .map(|oldest| self.limit.window().saturating_sub(now.duration_since(*oldest)))
                .unwrap_or_default();
            return Err(retry_after);
        }

        window.push_back(now);
        debug!(
            user = %user,
            used = window.len(),
            limit = self.limit.max_requests,
            "Call admitted"
        );
        Ok(())
    }

    fn prune(&self, window: &mut VecDeque<Instant>, now: Instant) {
        let span = self.limit.window();
        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) > span {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimit::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        let limit = RateLimit::default();
        assert_eq!(*limit.max_requests(), 10);
        assert_eq!(limit.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_limit_from_toml_uses_defaults() {
        let limit: RateLimit = toml::from_str("max_requests = 3").unwrap();
        assert_eq!(limit, RateLimit::new(3, 60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_counts_down() {
        let limiter = RateLimiter::new(RateLimit::new(3, 60));
        assert_eq!(limiter.remaining(UserId(1)), 3);
        limiter.allow(UserId(1));
        assert_eq!(limiter.remaining(UserId(1)), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_refuses_everything() {
        let limiter = RateLimiter::new(RateLimit::new(0, 60));
        assert!(!limiter.allow(UserId(1)));
    }
}
