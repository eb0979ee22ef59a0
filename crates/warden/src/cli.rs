//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warden - Discord allow-list bot over a full-document JSON store
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(about = "Discord allow-list bot over a full-document JSON store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file, read after ./warden.toml
    #[arg(short, long, global = true, env = "WARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Connect to Discord and serve slash commands
    Run,

    /// Fetch the allow-list and print it as JSON
    Dump {
        /// Read a saved export of the document instead of the remote store
        #[arg(long, value_name = "FILE")]
        from_file: Option<PathBuf>,
    },

    /// Load the configuration, check it, and print it with secrets hidden
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "warden",
            "dump",
            "--from-file",
            "bin.json",
            "-v",
            "--config",
            "x.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Dump {
                from_file: Some(PathBuf::from("bin.json"))
            }
        );
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_dump_defaults_to_remote_store() {
        let cli = Cli::try_parse_from(["warden", "dump"]).unwrap();
        assert_eq!(cli.command, Commands::Dump { from_file: None });
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["warden"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
