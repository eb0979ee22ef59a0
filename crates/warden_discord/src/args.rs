//! Command options to gateway requests.

use crate::{option_specs, OptionKind};
use std::collections::HashMap;
use std::str::FromStr;
use warden_error::{DiscordError, DiscordErrorKind, DiscordResult};
use warden_gateway::{Command, Request};

/// An option value as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// String option
    Text(String),
    /// Integer option
    Integer(i64),
}

/// Named option values of one interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    values: HashMap<String, ArgValue>,
}

impl CommandArgs {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any previous value of the same name.
    pub fn with(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Get a string option.
    #[track_caller]
    pub fn text(&self, name: &str) -> DiscordResult<String> {
        match self.values.get(name) {
            Some(ArgValue::Text(value)) => Ok(value.clone()),
            _ => Err(DiscordError::new(DiscordErrorKind::InvalidOption(
                name.to_string(),
            ))),
        }
    }

    /// Get an integer option.
    #[track_caller]
    pub fn integer(&self, name: &str) -> DiscordResult<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(value)) => Ok(*value),
            _ => Err(DiscordError::new(DiscordErrorKind::InvalidOption(
                name.to_string(),
            ))),
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, ArgValue)> for CommandArgs {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Build the gateway request for command `name`.
///
/// # Errors
///
/// Fails on an unknown command name, or when a required option is missing or
/// has the wrong type.
///
/// # Examples
///
/// ```
/// use warden_discord::{parse_request, ArgValue, CommandArgs};
/// use warden_gateway::Request;
///
/// let args = CommandArgs::new().with("uid", ArgValue::Text("abc123".into()));
/// assert_eq!(
///     parse_request("viewuid", &args).unwrap(),
///     Request::ViewUid { uid: "abc123".into() }
/// );
/// ```
pub fn parse_request(name: &str, args: &CommandArgs) -> DiscordResult<Request> {
    let command = Command::from_str(name)
        .map_err(|_| DiscordError::new(DiscordErrorKind::UnknownCommand(name.to_string())))?;

    // Type-check every declared option up front so the first bad one is reported.
    for spec in option_specs(command) {
        match spec.kind {
            OptionKind::Text => args.text(spec.name).map(drop)?,
            OptionKind::Integer => args.integer(spec.name).map(drop)?,
        }
    }

    let request = match command {
        Command::Help => Request::Help,
        Command::CheckUid => Request::CheckUid {
            uid: args.text("uid")?,
        },
        Command::ViewUid => Request::ViewUid {
            uid: args.text("uid")?,
        },
        Command::ListUids => Request::ListUids,
        Command::AddUid => Request::AddUid {
            uid: args.text("uid")?,
            year: args.integer("year")?,
            month: args.integer("month")?,
            day: args.integer("day")?,
            comment: args.text("comment")?,
        },
        Command::RemoveUid => Request::RemoveUid {
            uid: args.text("uid")?,
        },
        Command::Pause => Request::Pause,
        Command::Resume => Request::Resume,
    };
    Ok(request)
}
