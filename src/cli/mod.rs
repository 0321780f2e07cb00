//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Sitepack using clap.

pub mod commands;

use crate::config::resolve_config_path;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sitepack - Site configuration package exporter
#[derive(Parser, Debug)]
#[command(name = "sitepack")]
#[command(version, about, long_about = None)]
#[command(author = "Sitepack Contributors")]
pub struct Cli {
    /// Path to configuration file [default: $SITEPACK_CONFIG or sitepack.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SITEPACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration file this invocation reads
    pub fn config_path(&self) -> PathBuf {
        resolve_config_path(self.config.as_deref())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a package or the full site as an archive or flat files
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the generation status of the site artifact
    Status(commands::status::StatusArgs),

    /// Delete the site artifact and its generation marker
    Remove(commands::remove::RemoveArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Exit codes shared by all commands
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const EXPORT_FAILED: i32 = 1;
    pub const CONFIGURATION: i32 = 2;
    pub const USER_ABORT: i32 = 3;
    pub const FATAL: i32 = 5;
    pub const INTERRUPTED: i32 = 130;
}

/// Ask a yes/no question on stdout; anything but `y` is a no
pub(crate) fn confirm(prompt: &str) -> std::io::Result<bool> {
    use std::io::{self, Write};

    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["sitepack", "export"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["sitepack", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.config_path(), PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["sitepack", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_options() {
        let cli = Cli::parse_from([
            "sitepack",
            "export",
            "--package",
            "landing",
            "--format",
            "directory",
            "--path",
            "/srv/sync",
            "--chunk-size",
            "25",
            "--yes",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.package.as_deref(), Some("landing"));
        assert_eq!(args.format, "directory");
        assert_eq!(args.path, Some(PathBuf::from("/srv/sync")));
        assert_eq!(args.chunk_size, Some(25));
        assert!(args.yes);
        assert!(!args.keep_partial);
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["sitepack", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["sitepack", "status", "--verify"]);
        assert!(matches!(cli.command, Commands::Status(ref args) if args.verify));
    }

    #[test]
    fn test_cli_parse_remove() {
        let cli = Cli::parse_from(["sitepack", "remove", "--yes"]);
        assert!(matches!(cli.command, Commands::Remove(ref args) if args.yes));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["sitepack", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
