//! rootenv - Root environment discovery
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use rootenv::cli::{Cli, Commands};
use rootenv::config::{Config, ConfigManager};
use rootenv::error::RootEnvResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RootEnvResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    rootenv::ui::init_theme();
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Status(args) => rootenv::cli::commands::status(args, &config).await,
        Commands::Path(args) => rootenv::cli::commands::path(args, &config).await,
        Commands::Config(args) => {
            rootenv::cli::commands::config(args, &config_manager, &config).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `general.verbose` counts as one `-v`
fn init_logging(verbose: u8, config: &Config) {
    let level = verbose.max(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("rootenv=warn"),
        1 => EnvFilter::new("rootenv=info"),
        _ => EnvFilter::new("rootenv=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
