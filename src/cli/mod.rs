//! CLI command definitions for samp-runtime-env
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Json,
    Yaml,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

/// SA-MP runtime configuration with environment variable overrides
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Runtime directory containing samp.json or samp.yaml
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the fully merged runtime configuration (default if no subcommand given)
    Show(ShowArgs),

    /// List the environment variables that can override the runtime
    Vars(ShowArgs),

    /// Load and validate the runtime, reporting the first problem
    Check,
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["samp-runtime-env"]);
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.log, "2");
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_show_with_format() {
        let cli = Cli::parse_from(["samp-runtime-env", "--dir", "server", "show", "-f", "yaml"]);
        assert_eq!(cli.dir, PathBuf::from("server"));
        match cli.command {
            Some(Command::Show(args)) => assert_eq!(args.format, FormatArg::Yaml),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["samp-runtime-env", "check", "-v", "--log", "off"]);
        assert!(cli.verbose);
        assert_eq!(cli.log, "off");
        assert!(matches!(cli.command, Some(Command::Check)));
    }
}
