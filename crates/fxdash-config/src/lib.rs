//! Configuration management.

mod settings;

pub use settings::{
    ApiConfig, AppConfig, AppSettings, CacheConfig, DashboardConfig, LoggingConfig, PreferencesConfig,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `FXDASH__CACHE__TTL_SECS=60`.
pub const ENV_PREFIX: &str = "FXDASH";

/// Load configuration from an optional file and the environment.
///
/// A missing file is not an error; every setting has a default.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dashboard.symbols")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.dashboard.default_base, "EUR");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fxdash.toml");
        fs::write(
            &path,
            r#"
[cache]
ttl_secs = 60

[dashboard]
default_base = "usd"
symbols = ["EUR", "JPY"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.dashboard.symbols, vec!["EUR", "JPY"]);
        assert_eq!(config.api.retry_attempts, 2);
    }

    #[test]
    fn test_shipped_default_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/default.toml");
        let config = load_config(&path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.preferences.history_limit, 20);
    }
}
