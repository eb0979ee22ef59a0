//! Discord transport error types.

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Serenity API error (HTTP, gateway, rate limit).
    #[display("Serenity API error: {_0}")]
    SerenityError(String),

    /// Connection to the Discord gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Slash command registration failed.
    #[display("Command registration failed: {_0}")]
    RegistrationFailed(String),

    /// Interaction response failed.
    #[display("Interaction failed: {_0}")]
    InteractionFailed(String),

    /// Audit log message failed to send.
    #[display("Message send failed: {_0}")]
    MessageSendFailed(String),

    /// The interaction named a command this bot does not serve.
    #[display("Unknown command '{_0}'")]
    UnknownCommand(String),

    /// A required command option was missing or had the wrong type.
    #[display("Invalid option '{_0}'")]
    InvalidOption(String),
}

/// Discord error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    /// The specific error kind
    pub kind: DiscordErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use warden_error::{DiscordError, DiscordErrorKind};
    ///
    /// let err = DiscordError::new(DiscordErrorKind::InvalidOption("uid".to_string()));
    /// assert!(format!("{}", err).contains("uid"));
    /// ```
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DiscordErrorKind {
        &self.kind
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;
