//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rootenv - Root environment discovery
///
/// Locates the root framework's runtime path on the device, reports its
/// version and boot layout, and diagnoses missing root access.
#[derive(Parser, Debug)]
#[command(name = "rootenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ROOTENV_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the environment and print a full report
    Status(StatusArgs),

    /// Print the runtime path (or a path derived from it)
    Path(PathArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Re-probe even if a path is already known
    #[arg(short, long)]
    pub force: bool,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the path command
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Print the read-only mirror of the system partitions
    #[arg(long, conflicts_with = "modules")]
    pub mirror: bool,

    /// Print the loaded-modules view
    #[arg(long)]
    pub modules: bool,

    /// Re-probe even if a path is already known
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a configuration file with defaults
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,

        /// Answer yes to the overwrite prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format for the status report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Table,
    /// JSON object
    Json,
}
