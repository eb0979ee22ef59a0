//! Process-wide pause switch for mutating commands.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// The two states of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PauseState {
    /// Mutations allowed
    Active,
    /// Mutations refused
    Paused,
}

/// Single boolean gating every mutating command.
///
/// Starts `Active`; only explicit [`PauseGate::set_paused`] calls move it.
/// Not persisted across restarts.
///
/// # Examples
///
/// ```
/// use warden_security::{PauseGate, PauseState};
///
/// let gate = PauseGate::new();
/// assert_eq!(gate.state(), PauseState::Active);
///
/// assert!(!gate.set_paused(true));
/// assert!(gate.set_paused(true));
/// assert!(gate.is_paused());
/// ```
#[derive(Debug, Default)]
pub struct PauseGate {
    paused: AtomicBool,
}

impl PauseGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether mutations are currently refused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Set the flag, returning its previous value.
    pub fn set_paused(&self, value: bool) -> bool {
        let previous = self.paused.swap(value, Ordering::SeqCst);
        if previous != value {
            info!(paused = value, "Pause gate changed");
        }
        previous
    }

    /// Current state.
    pub fn state(&self) -> PauseState {
        if self.is_paused() {
            PauseState::Paused
        } else {
            PauseState::Active
        }
    }
}
