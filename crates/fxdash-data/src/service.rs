//! Cache-fronted access to an upstream rate source.
//!
//! Every fetch goes through the [`RateCache`]. On a miss the request is
//! retried per the [`RetryPolicy`]; when the budget is spent the caller gets
//! an empty value of the right shape instead of an error. Fallback values are
//! never cached.
//!
//! Concurrent misses for the same key are not coalesced: both reach the
//! source and the later response wins the cache slot.

use chrono::{DateTime, Days, NaiveDate, Utc};
use fxdash_analytics::{build_overview, CurrencyOverview};
use fxdash_core::error::{FxError, FxResult};
use fxdash_core::sanitize::{sanitize_amount, sanitize_range};
use fxdash_core::traits::RateSource;
use fxdash_core::types::{Currencies, CurrencyCode, RatePoint, TimeSeries};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{build_key, CacheKind, RateCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::conversion::{Conversion, DEFAULT_AMOUNT};
use crate::retry::{retry, RetryPolicy};

/// Days covered by the weekly change.
pub const WEEK_DAYS: u64 = 7;
/// Days covered by the monthly change.
pub const MONTH_DAYS: u64 = 30;

#[derive(Debug, Clone)]
enum Cached {
    Rates(RatePoint),
    Series(TimeSeries),
    Currencies(Currencies),
}

/// Service settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base used for "no data" fallbacks
    pub default_base: CurrencyCode,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_base: CurrencyCode::EUR,
            cache_ttl: DEFAULT_TTL,
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            retry: RetryPolicy::default(),
        }
    }
}

/// Everything the dashboard shows for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub base: CurrencyCode,
    /// Publication date of the latest rates
    pub date: Option<NaiveDate>,
    pub rows: Vec<CurrencyOverview>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn empty(base: CurrencyCode) -> Self {
        Self {
            base,
            date: None,
            rows: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cache-fronted rate access with retry and empty fallbacks.
pub struct RateService {
    source: Arc<dyn RateSource>,
    cache: Mutex<RateCache<Cached>>,
    config: ServiceConfig,
}

impl RateService {
    /// Create a service over `source`.
    pub fn new(source: Arc<dyn RateSource>, config: ServiceConfig) -> Self {
        let cache = RateCache::new(config.cache_ttl, config.cache_max_entries);
        Self {
            source,
            cache: Mutex::new(cache),
            config,
        }
    }

    pub fn default_base(&self) -> CurrencyCode {
        self.config.default_base
    }

    /// Number of cached entries, including expired ones not yet purged.
    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    /// Drop all cached responses.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, RateCache<Cached>> {
        // Cache contents stay consistent even if a holder panicked.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, key: &str) -> Option<Cached> {
        self.lock_cache().get(key)
    }

    fn store(&self, key: String, value: Cached) {
        self.lock_cache().put(key, value);
    }

    /// Latest rates for `base`. Empty `symbols` requests every currency.
    pub async fn latest(&self, base: CurrencyCode, symbols: &[CurrencyCode]) -> RatePoint {
        let key = build_key(CacheKind::Latest, &[], base, symbols);
        if let Some(Cached::Rates(point)) = self.cached(&key) {
            return point;
        }

        let source: &dyn RateSource = self.source.as_ref();
        match retry(&self.config.retry, "latest", move || source.latest(base, symbols)).await {
            Ok(point) => {
                info!(base = %base, currencies = point.len(), "fetched latest rates");
                self.store(key, Cached::Rates(point.clone()));
                point
            }
            Err(err) => {
                warn!(base = %base, error = %err, "latest rates unavailable, using empty fallback");
                RatePoint::empty(self.config.default_base)
            }
        }
    }

    /// Rates published on `date`.
    pub async fn historical(&self, date: NaiveDate, base: CurrencyCode, symbols: &[CurrencyCode]) -> RatePoint {
        let key = build_key(CacheKind::Historical, &[date], base, symbols);
        if let Some(Cached::Rates(point)) = self.cached(&key) {
            return point;
        }

        let source: &dyn RateSource = self.source.as_ref();
        match retry(&self.config.retry, "historical", move || source.historical(date, base, symbols)).await {
            Ok(point) => {
                info!(base = %base, date = %date, "fetched historical rates");
                self.store(key, Cached::Rates(point.clone()));
                point
            }
            Err(err) => {
                warn!(base = %base, date = %date, error = %err, "historical rates unavailable, using empty fallback");
                RatePoint::empty(self.config.default_base)
            }
        }
    }

    /// Daily rates between `start` and `end` inclusive.
    ///
    /// The range is ordered and clamped to published dates up to `today`.
    pub async fn time_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
        base: CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> TimeSeries {
        let (start, end) = sanitize_range(start, end, today);
        let key = build_key(CacheKind::TimeSeries, &[start, end], base, symbols);
        if let Some(Cached::Series(series)) = self.cached(&key) {
            return series;
        }

        let source: &dyn RateSource = self.source.as_ref();
        match retry(&self.config.retry, "time_series", move || {
            source.time_series(start, end, base, symbols)
        })
        .await
        {
            Ok(series) => {
                info!(base = %base, start = %start, end = %end, days = series.len(), "fetched time series");
                self.store(key, Cached::Series(series.clone()));
                series
            }
            Err(err) => {
                warn!(base = %base, error = %err, "time series unavailable, using empty fallback");
                TimeSeries::empty(self.config.default_base, start, end)
            }
        }
    }

    /// Supported currencies.
    pub async fn currencies(&self) -> Currencies {
        let key = build_key(CacheKind::Currencies, &[], self.config.default_base, &[]);
        if let Some(Cached::Currencies(list)) = self.cached(&key) {
            return list;
        }

        let source: &dyn RateSource = self.source.as_ref();
        match retry(&self.config.retry, "currencies", move || source.currencies()).await {
            Ok(list) => {
                info!(count = list.len(), "fetched currency list");
                self.store(key, Cached::Currencies(list.clone()));
                list
            }
            Err(err) => {
                warn!(error = %err, "currency list unavailable, using empty fallback");
                Currencies::new()
            }
        }
    }

    /// Convert `amount` of `from` into `to` at the latest rate.
    ///
    /// A non-finite or negative amount is replaced by 1. Fails when no rate is
    /// available or the amount is too large to convert.
    pub async fn convert(&self, amount: f64, from: CurrencyCode, to: CurrencyCode) -> FxResult<Conversion> {
        let amount = sanitize_amount(amount, DEFAULT_AMOUNT);
        let rate = if from == to {
            1.0
        } else {
            let latest = self.latest(from, &[to]).await;
            // Empty fallback is quoted against the default base
            latest
                .rates
                .get(&to)
                .copied()
                .filter(|_| latest.base == from)
                .ok_or(FxError::RateUnavailable { from, to })?
        };

        debug!(from = %from, to = %to, rate, "converting");
        Conversion::new(from, to, amount, rate)
    }

    /// Latest, prior-day, weekly and monthly data folded into dashboard rows.
    pub async fn overview(&self, base: CurrencyCode, symbols: &[CurrencyCode], today: NaiveDate) -> MarketSnapshot {
        let latest = self.latest(base, symbols).await;
        if latest.is_empty() {
            return MarketSnapshot::empty(base);
        }

        let reference = latest.date.unwrap_or(today);
        let prior_day = reference.checked_sub_days(Days::new(1)).unwrap_or(reference);
        let week_start = reference.checked_sub_days(Days::new(WEEK_DAYS)).unwrap_or(reference);
        let month_start = reference.checked_sub_days(Days::new(MONTH_DAYS)).unwrap_or(reference);

        let (previous, weekly, monthly) = futures::join!(
            self.historical(prior_day, base, symbols),
            self.time_series(week_start, reference, today, base, symbols),
            self.time_series(month_start, reference, today, base, symbols),
        );

        MarketSnapshot {
            base,
            date: latest.date,
            rows: build_overview(&latest, &previous, &weekly, &monthly),
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fxdash_core::error::SourceError;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// In-memory source: EUR/USD at 1.10 on 2024-01-10, 1.00 the day before,
    /// and a flat 1.00 history. USD-based latest quotes EUR at 0.92.
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        failures_left: AtomicUsize,
        historical_down: bool,
    }

    impl FakeSource {
        fn failing(times: usize) -> Self {
            Self {
                failures_left: AtomicUsize::new(times),
                ..Self::default()
            }
        }

        fn without_history() -> Self {
            Self {
                historical_down: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn tick(&self) -> Result<(), SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(SourceError::Connection("unreachable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RateSource for FakeSource {
        async fn latest(&self, base: CurrencyCode, _symbols: &[CurrencyCode]) -> Result<RatePoint, SourceError> {
            self.tick()?;
            let quote = if base == CurrencyCode::USD {
                (CurrencyCode::EUR, 0.92)
            } else {
                (CurrencyCode::USD, 1.10)
            };
            Ok(RatePoint::new(base, Some(date("2024-01-10")), BTreeMap::from([quote])))
        }

        async fn historical(
            &self,
            date: NaiveDate,
            base: CurrencyCode,
            _symbols: &[CurrencyCode],
        ) -> Result<RatePoint, SourceError> {
            self.tick()?;
            if self.historical_down {
                return Err(SourceError::Status { status: 404, body: "not found".into() });
            }
            Ok(RatePoint::new(base, Some(date), BTreeMap::from([(CurrencyCode::USD, 1.00)])))
        }

        async fn time_series(
            &self,
            start: NaiveDate,
            end: NaiveDate,
            base: CurrencyCode,
            _symbols: &[CurrencyCode],
        ) -> Result<TimeSeries, SourceError> {
            self.tick()?;
            let mut series = TimeSeries::empty(base, start, end);
            series.points.insert(start, BTreeMap::from([(CurrencyCode::USD, 1.00)]));
            series.points.insert(end, BTreeMap::from([(CurrencyCode::USD, 1.00)]));
            Ok(series)
        }

        async fn currencies(&self) -> Result<Currencies, SourceError> {
            self.tick()?;
            Ok(BTreeMap::from([(CurrencyCode::USD, "United States Dollar".to_string())]))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn service(source: Arc<FakeSource>) -> RateService {
        let config = ServiceConfig {
            retry: RetryPolicy::new(2, Duration::from_millis(10)),
            ..ServiceConfig::default()
        };
        RateService::new(source, config)
    }

    #[tokio::test]
    async fn test_latest_is_cached() {
        let source = Arc::new(FakeSource::default());
        let service = service(source.clone());

        let first = service.latest(CurrencyCode::EUR, &[CurrencyCode::USD]).await;
        let second = service.latest(CurrencyCode::EUR, &[CurrencyCode::USD]).await;

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
        assert_eq!(service.cached_entries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_retried() {
        let source = Arc::new(FakeSource::failing(1));
        let service = service(source.clone());

        let point = service.latest(CurrencyCode::EUR, &[CurrencyCode::USD]).await;
        assert_eq!(point.rate(CurrencyCode::USD), Some(1.10));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back_to_empty() {
        let source = Arc::new(FakeSource::failing(10));
        let service = service(source.clone());

        let point = service.latest(CurrencyCode::USD, &[CurrencyCode::EUR]).await;
        assert!(point.is_empty());
        assert_eq!(point.base, CurrencyCode::EUR);
        assert_eq!(source.calls(), 2);

        // Fallbacks are not cached
        assert_eq!(service.cached_entries(), 0);
        assert!(service.currencies().await.is_empty());
    }

    #[tokio::test]
    async fn test_time_series_range_is_sanitized() {
        let source = Arc::new(FakeSource::default());
        let service = service(source.clone());
        let today = date("2024-01-10");

        let series = service
            .time_series(date("2024-03-01"), date("2024-01-01"), today, CurrencyCode::EUR, &[])
            .await;
        assert_eq!(series.start_date, date("2024-01-01"));
        assert_eq!(series.end_date, today);
    }

    #[tokio::test]
    async fn test_convert() {
        let source = Arc::new(FakeSource::default());
        let service = service(source.clone());

        let conv = service
            .convert(100.0, CurrencyCode::EUR, CurrencyCode::USD)
            .await
            .unwrap();
        assert_eq!(conv.result, dec!(110));

        let same = service
            .convert(f64::NAN, CurrencyCode::GBP, CurrencyCode::GBP)
            .await
            .unwrap();
        assert_eq!(same.rate, 1.0);
        assert_eq!(same.result, dec!(1));

        assert!(matches!(
            service.convert(1.0, CurrencyCode::EUR, CurrencyCode::JPY).await,
            Err(FxError::RateUnavailable { .. })
        ));
        assert!(matches!(
            service.convert(1e30, CurrencyCode::EUR, CurrencyCode::USD).await,
            Err(FxError::AmountOutOfRange(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_convert_without_data() {
        let source = Arc::new(FakeSource::failing(10));
        let service = service(source);
        assert!(matches!(
            service.convert(1.0, CurrencyCode::USD, CurrencyCode::JPY).await,
            Err(FxError::RateUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_overview_eur_usd() {
        let source = Arc::new(FakeSource::default());
        let service = service(source.clone());

        let snapshot = service
            .overview(CurrencyCode::EUR, &[CurrencyCode::USD], date("2024-01-12"))
            .await;

        assert_eq!(snapshot.base, CurrencyCode::EUR);
        assert_eq!(snapshot.date, Some(date("2024-01-10")));
        assert_eq!(snapshot.rows.len(), 1);

        let usd = &snapshot.rows[0];
        let change = usd.change_24h.unwrap();
        assert!((change.change - 0.10).abs() < 1e-10);
        assert!((change.change_percent - 10.0).abs() < 1e-10);
        assert!((usd.change_7d.unwrap() - 10.0).abs() < 1e-10);
        assert!(usd.strength.is_some());

        // latest + historical + two series
        assert_eq!(source.calls(), 4);
        service
            .overview(CurrencyCode::EUR, &[CurrencyCode::USD], date("2024-01-12"))
            .await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_overview_ignores_fallback_for_other_base() {
        let source = Arc::new(FakeSource::without_history());
        let service = service(source);

        let snapshot = service
            .overview(CurrencyCode::USD, &[CurrencyCode::EUR], date("2024-01-12"))
            .await;
        assert_eq!(snapshot.rows.len(), 1);

        let eur = &snapshot.rows[0];
        assert_eq!(eur.code, CurrencyCode::EUR);
        assert_eq!(eur.rate, 0.92);
        assert!(eur.change_24h.is_none());
        assert_eq!(eur.strength.map(|s| s.score), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overview_without_data_is_empty() {
        let source = Arc::new(FakeSource::failing(100));
        let service = service(source);

        let snapshot = service
            .overview(CurrencyCode::EUR, &[CurrencyCode::USD], date("2024-01-12"))
            .await;
        assert!(snapshot.is_empty());
    }
}
