//! Security error types.

/// Specific security error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SecurityErrorKind {
    /// Command used outside the designated channel
    #[display("Channel {} is not the designated channel", channel)]
    WrongChannel {
        /// Channel the command arrived in
        channel: u64,
    },

    /// Caller lacks the privilege the command requires
    #[display("Permission denied for command '{}': {}", command, reason)]
    PermissionDenied {
        /// Command that was denied
        command: String,
        /// Reason for denial
        reason: String,
    },

    /// Mutating command while the allow-list is paused
    #[display("Command '{}' refused: allow-list is paused", command)]
    Paused {
        /// Command that was refused
        command: String,
    },

    /// Rate limit exceeded
    #[display(
        "Rate limit exceeded for user {}: {} per {}s, retry after {}s",
        user,
        limit,
        window_secs,
        retry_after_secs
    )]
    RateLimitExceeded {
        /// User that exceeded the limit
        user: u64,
        /// Admitted calls per window
        limit: u32,
        /// Window length in seconds
        window_secs: u64,
        /// Seconds until the oldest call leaves the window
        retry_after_secs: u64,
    },

    /// Validation failed
    #[display("Validation failed for '{}': {}", field, reason)]
    ValidationFailed {
        /// Field that failed validation
        field: String,
        /// Reason for failure
        reason: String,
    },
}

/// Security error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Security Error: {} at line {} in {}", kind, line, file)]
pub struct SecurityError {
    /// The specific error kind
    pub kind: SecurityErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl SecurityError {
    /// Create a new security error with location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SecurityErrorKind {
        &self.kind
    }

    /// Message suitable for the person who issued the command.
    pub fn user_message(&self) -> String {
        match &self.kind {
            SecurityErrorKind::WrongChannel { .. } => {
                "You can only use commands in the assigned whitelist channel.".to_string()
            }
            SecurityErrorKind::PermissionDenied { .. } => {
                "Only the **bot owner** can use this command.".to_string()
            }
            SecurityErrorKind::Paused { .. } => {
                "Whitelist system is currently **PAUSED**.".to_string()
            }
            SecurityErrorKind::RateLimitExceeded {
                retry_after_secs, ..
            } => format!(
                "You are sending commands too quickly. Try again in {}s.",
                retry_after_secs
            ),
            SecurityErrorKind::ValidationFailed { field, reason } => {
                format!("Invalid {}: {}.", field, reason)
            }
        }
    }
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
