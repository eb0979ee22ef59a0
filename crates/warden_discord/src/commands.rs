//! Slash command definitions.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};
use strum::IntoEnumIterator;
use warden_gateway::Command;

/// Option value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text
    Text,
    /// Whole number
    Integer,
}

/// One slash command option. Every option is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as sent by the client
    pub name: &'static str,
    /// Hint shown in the client
    pub description: &'static str,
    /// Value type
    pub kind: OptionKind,
}

const UID: OptionSpec = OptionSpec {
    name: "uid",
    description: "UID",
    kind: OptionKind::Text,
};

const UID_OPTIONS: [OptionSpec; 1] = [UID];

const ADD_OPTIONS: [OptionSpec; 5] = [
    UID,
    OptionSpec {
        name: "year",
        description: "Expiry year",
        kind: OptionKind::Integer,
    },
    OptionSpec {
        name: "month",
        description: "Expiry month (1-12)",
        kind: OptionKind::Integer,
    },
    OptionSpec {
        name: "day",
        description: "Expiry day of month",
        kind: OptionKind::Integer,
    },
    OptionSpec {
        name: "comment",
        description: "Note stored with the entry",
        kind: OptionKind::Text,
    },
];

/// Options taken by `command`, in order.
pub fn option_specs(command: Command) -> &'static [OptionSpec] {
    match command {
        Command::CheckUid | Command::ViewUid | Command::RemoveUid => &UID_OPTIONS,
        Command::AddUid => &ADD_OPTIONS,
        Command::Help | Command::ListUids | Command::Pause | Command::Resume => &[],
    }
}

/// Builders for every command, ready for global registration.
pub fn slash_commands() -> Vec<CreateCommand> {
    Command::iter()
        .map(|command| {
            option_specs(command).iter().fold(
                CreateCommand::new(command.as_ref()).description(command.description()),
                |builder, spec| {
                    let kind = match spec.kind {
                        OptionKind::Text => CommandOptionType::String,
                        OptionKind::Integer => CommandOptionType::Integer,
                    };
                    builder.add_option(
                        CreateCommandOption::new(kind, spec.name, spec.description).required(true),
                    )
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_match_usage() {
        for command in Command::iter() {
            let names: Vec<_> = option_specs(command)
                .iter()
                .map(|spec| format!("<{}>", spec.name))
                .collect();
            assert_eq!(names.join(" "), command.arguments(), "{}", command);
        }
    }

    #[test]
    fn test_one_builder_per_command() {
        assert_eq!(slash_commands().len(), Command::iter().count());
    }
}
