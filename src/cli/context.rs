//! Services shared by every command.

use anyhow::{Context, Result};
use fxdash_config::AppConfig;
use fxdash_core::types::CurrencyCode;
use fxdash_data::{FrankfurterSource, PreferenceStore, RateService, ReqwestTransport, RetryPolicy, ServiceConfig};
use std::sync::Arc;
use std::time::Duration;

use super::MarketArgs;

/// Composition root: built once from the configuration.
pub struct AppContext {
    pub config: AppConfig,
    pub service: Arc<RateService>,
    pub preferences: PreferenceStore,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(config.api.timeout_ms))
            .context("Failed to build HTTP client")?;
        let source = FrankfurterSource::new(transport, config.api.base_url.clone());

        let service = RateService::new(
            Arc::new(source),
            ServiceConfig {
                default_base: config.dashboard.base(),
                cache_ttl: Duration::from_secs(config.cache.ttl_secs),
                cache_max_entries: config.cache.max_entries,
                retry: RetryPolicy::new(
                    config.api.retry_attempts,
                    Duration::from_millis(config.api.retry_delay_ms),
                ),
            },
        );

        let preferences = PreferenceStore::new(
            &config.preferences.path,
            config.preferences.history_limit,
            config.preferences.favorites_limit,
        );

        Ok(Self {
            config,
            service: Arc::new(service),
            preferences,
        })
    }

    /// Base currency from `input`, or the configured default.
    pub fn base(&self, input: Option<&str>) -> CurrencyCode {
        let default = self.config.dashboard.base();
        input.map_or(default, |s| CurrencyCode::sanitize(s, default))
    }

    /// Resolve the base and symbols a command should query.
    ///
    /// Explicit symbols win over the configured list; `--all` queries every
    /// currency. The base itself is never requested as a symbol.
    pub fn market(&self, args: &MarketArgs) -> (CurrencyCode, Vec<CurrencyCode>) {
        let base = self.base(args.base.as_deref());
        if args.all {
            return (base, Vec::new());
        }

        let mut symbols = if args.symbols.is_empty() {
            self.config.dashboard.symbol_codes()
        } else {
            CurrencyCode::sanitize_list(&args.symbols)
        };
        symbols.retain(|c| *c != base);
        (base, symbols)
    }
}
