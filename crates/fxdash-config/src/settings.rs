//! Configuration structures.

use fxdash_core::error::FxError;
use fxdash_core::types::CurrencyCode;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

impl AppConfig {
    /// Reject settings the dashboard cannot run with.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.cache.max_entries == 0 {
            return Err(FxError::Config("cache.max_entries must be at least 1".into()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(FxError::Config("cache.ttl_secs must be positive".into()));
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(FxError::Config("dashboard.refresh_interval_secs must be positive".into()));
        }
        if CurrencyCode::parse(&self.dashboard.default_base).is_none() {
            return Err(FxError::InvalidCurrency(self.dashboard.default_base.clone()));
        }
        if self.api.timeout_ms == 0 {
            return Err(FxError::Config("api.timeout_ms must be positive".into()));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(FxError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Render as TOML, e.g. to bootstrap a config file.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "fxdash".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Total attempts per request, including the first
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.dev/v1".to_string(),
            timeout_ms: 10_000,
            retry_attempts: 2,
            retry_delay_ms: 250,
        }
    }
}

/// Rate cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: 100,
        }
    }
}

/// Dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_base: String,
    /// Currencies shown; empty shows all
    pub symbols: Vec<String>,
    pub refresh_interval_secs: u64,
    pub debounce_ms: u64,
    pub ma_period: usize,
    pub ema_period: usize,
}

impl DashboardConfig {
    /// Default base, sanitized.
    pub fn base(&self) -> CurrencyCode {
        CurrencyCode::sanitize(&self.default_base, CurrencyCode::EUR)
    }

    /// Configured symbols, sanitized and deduplicated.
    pub fn symbol_codes(&self) -> Vec<CurrencyCode> {
        CurrencyCode::sanitize_list(&self.symbols)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_base: "EUR".to_string(),
            symbols: ["USD", "GBP", "JPY", "CHF", "AUD", "CAD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            refresh_interval_secs: 300,
            debounce_ms: 300,
            ma_period: 7,
            ema_period: 14,
        }
    }
}

/// Preference store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub path: String,
    pub history_limit: usize,
    pub favorites_limit: usize,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: "data/preferences.json".to_string(),
            history_limit: 20,
            favorites_limit: 10,
        }
    }
}
