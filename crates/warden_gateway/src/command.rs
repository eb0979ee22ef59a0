//! The command catalogue and each command's access policy.

use strum::IntoEnumIterator;
use warden_security::AccessPolicy;

/// Every user-facing command.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    /// Show the command list
    Help,
    /// Show one entry as JSON
    CheckUid,
    /// Show one entry as a formatted box
    ViewUid,
    /// Show every entry as JSON
    ListUids,
    /// Add or update an entry
    AddUid,
    /// Remove an entry
    RemoveUid,
    /// Stop accepting mutations
    Pause,
    /// Accept mutations again
    Resume,
}

const PUBLIC_READ: AccessPolicy = AccessPolicy {
    owner_only: false,
    mutating: false,
    rate_limited: false,
};

impl Command {
    /// Which guards apply to this command.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_gateway::Command;
    ///
    /// assert!(Command::AddUid.policy().rate_limited);
    /// assert!(Command::RemoveUid.policy().owner_only);
    /// assert!(!Command::ListUids.policy().mutating);
    /// ```
    pub const fn policy(self) -> AccessPolicy {
        match self {
            Self::Help | Self::CheckUid | Self::ViewUid | Self::ListUids => PUBLIC_READ,
            Self::AddUid => AccessPolicy {
                owner_only: false,
                mutating: true,
                rate_limited: true,
            },
            Self::RemoveUid => AccessPolicy {
                owner_only: true,
                mutating: true,
                rate_limited: false,
            },
            Self::Pause | Self::Resume => AccessPolicy {
                owner_only: true,
                mutating: false,
                rate_limited: false,
            },
        }
    }

    /// One-line description shown in the client's command picker.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Help => "Show all bot commands",
            Self::CheckUid => "Check UID JSON",
            Self::ViewUid => "UID box view",
            Self::ListUids => "List all UIDs",
            Self::AddUid => "Add a UID entry",
            Self::RemoveUid => "Remove a UID",
            Self::Pause => "Pause whitelist",
            Self::Resume => "Resume whitelist",
        }
    }

    /// Argument synopsis, e.g. `<uid>`.
    pub const fn arguments(self) -> &'static str {
        match self {
            Self::CheckUid | Self::ViewUid | Self::RemoveUid => "<uid>",
            Self::AddUid => "<uid> <year> <month> <day> <comment>",
            Self::Help | Self::ListUids | Self::Pause | Self::Resume => "",
        }
    }

    /// Usage line, e.g. `/checkuid <uid>`.
    pub fn usage(self) -> String {
        match self.arguments() {
            "" => format!("/{}", self),
            args => format!("/{} {}", self, args),
        }
    }
}

/// The reply to `/help`, built from the catalogue.
pub fn help_text() -> String {
    let section = |owner_only: bool| {
        Command::iter()
            .filter(|command| command.policy().owner_only == owner_only)
            .map(|command| format!("`{}`\n", command.usage()))
            .collect::<String>()
    };

    format!(
        "**📘 Whitelist Bot Commands**\n\n🔵 Public:\n{}\n🟣 Owner Only:\n{}",
        section(false),
        section(true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_names_round_trip() {
        for command in Command::iter() {
            assert_eq!(Command::from_str(command.as_ref()).unwrap(), command);
        }
        assert_eq!(Command::CheckUid.to_string(), "checkuid");
        assert!(Command::from_str("dropall").is_err());
    }

    #[test]
    fn test_only_adduid_is_rate_limited() {
        let limited: Vec<_> = Command::iter()
            .filter(|command| command.policy().rate_limited)
            .collect();
        assert_eq!(limited, vec![Command::AddUid]);
    }

    #[test]
    fn test_mutating_commands() {
        let mutating: Vec<_> = Command::iter()
            .filter(|command| command.policy().mutating)
            .collect();
        assert_eq!(mutating, vec![Command::AddUid, Command::RemoveUid]);
    }

    #[test]
    fn test_help_lists_every_command_once() {
        let help = help_text();
        for command in Command::iter() {
            assert_eq!(help.matches(&format!("`{}", command.usage())).count(), 1);
        }
        let owner_section = help.split("Owner Only").nth(1).unwrap();
        assert!(owner_section.contains("/removeuid <uid>"));
        assert!(!owner_section.contains("/adduid"));
    }
}
