//! Validate configuration command.

use anyhow::Result;
use fxdash_config::{load_config, AppConfig};
use std::path::Path;

use crate::cli::ValidateArgs;

pub async fn run(args: &ValidateArgs, config_path: &Path) -> Result<()> {
    if args.print_default {
        print!("{}", AppConfig::default().to_toml()?);
        return Ok(());
    }

    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found; built-in defaults and environment overrides apply.");
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("API: {}", config.api.base_url);
    println!("Cache: {} entries, {}s TTL", config.cache.max_entries, config.cache.ttl_secs);
    println!("Default base: {}", config.dashboard.base());
    println!(
        "Symbols: {}",
        config
            .dashboard
            .symbol_codes()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Refresh interval: {}s", config.dashboard.refresh_interval_secs);
    println!("Preferences: {}", config.preferences.path);

    Ok(())
}
