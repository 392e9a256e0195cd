//! Forex dashboard CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use fxdash_config::load_config;
use fxdash_monitor::setup_logging;
use std::path::PathBuf;

const WATCH_LOG_FILE: &str = "logs/fxdash.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Reported by the command itself
    if let Commands::ValidateConfig(args) = &cli.command {
        let _guard = setup_logging(cli.log_level_str("info"), cli.json_logs, None);
        return cli::commands::validate::run(args, &cli.config).await;
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    config.validate().context("Invalid configuration")?;

    // Setup logging. The TUI owns the terminal, so `watch` logs to a file only.
    let log_file = match (&cli.command, &config.logging.file) {
        (_, Some(file)) => Some(PathBuf::from(file)),
        (Commands::Watch(_), None) => Some(PathBuf::from(WATCH_LOG_FILE)),
        _ => None,
    };
    let json = cli.json_logs || config.logging.format == "json";
    let _guard = setup_logging(cli.log_level_str(&config.logging.level), json, log_file.as_deref());

    let ctx = cli::AppContext::new(config)?;

    // Execute command
    match cli.command {
        Commands::Latest(args) => cli::commands::latest::run(args, &ctx).await,
        Commands::Convert(args) => cli::commands::convert::run(args, &ctx).await,
        Commands::Series(args) => cli::commands::series::run(args, &ctx).await,
        Commands::Overview(args) => cli::commands::overview::run(args, &ctx).await,
        Commands::Currencies(args) => cli::commands::currencies::run(args, &ctx).await,
        Commands::Export(args) => cli::commands::export::run(args, &ctx).await,
        Commands::Favorites(args) => cli::commands::favorites::run(args, &ctx).await,
        Commands::History(args) => cli::commands::history::run(args, &ctx).await,
        Commands::Watch(args) => cli::commands::watch::run(args, ctx).await,
        Commands::ValidateConfig(_) => Ok(()),
    }
}
