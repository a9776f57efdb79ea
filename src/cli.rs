//! Command-line interface definitions for foldmon.
//!
//! Shared between the main binary and xtask, which renders the man page from
//! the same definitions.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for foldmon.
#[derive(Parser, Debug)]
#[command(
    name = "foldmon",
    version = crate::VERSION,
    about = "Directory snapshot monitor",
    long_about = "Watches one directory, classifies its files by extension and reports \
                  what was added, deleted or modified since the last committed snapshot"
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `watch`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory to monitor
    #[arg(short, long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file to load
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "FOLDMON_CONFIG_PATH"
    )]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not print the command prompt
    #[arg(long, global = true)]
    pub no_prompt: bool,
}

/// All available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Read commit, status, info and exit commands from standard input
    Watch,

    /// Scan once and list tracked files with their type
    List,

    /// Scan once and print the report of a file
    Info {
        /// File name inside the monitored directory
        filename: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_subcommand_is_none() {
        let cli = Cli::try_parse_from(["foldmon", "--no-prompt"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(cli.no_prompt);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["foldmon", "info", "notes.txt", "--root", "/srv/x", "-q"])
            .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Info {
                filename: "notes.txt".into()
            })
        );
        assert_eq!(cli.root, Some(PathBuf::from("/srv/x")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_info_requires_filename() {
        assert!(Cli::try_parse_from(["foldmon", "info"]).is_err());
    }
}
