//! Rate source trait definitions.

use crate::error::SourceError;
use crate::types::{Currencies, CurrencyCode, RatePoint, TimeSeries};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for upstream exchange-rate providers.
///
/// Implementations return sanitized payloads: malformed entries are already
/// dropped. An empty `symbols` slice requests every available currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the most recent published rates.
    async fn latest(&self, base: CurrencyCode, symbols: &[CurrencyCode]) -> Result<RatePoint, SourceError>;

    /// Fetch rates published on (or closest before) `date`.
    async fn historical(
        &self,
        date: NaiveDate,
        base: CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> Result<RatePoint, SourceError>;

    /// Fetch daily rates between `start` and `end`, inclusive.
    async fn time_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> Result<TimeSeries, SourceError>;

    /// Fetch the list of supported currencies.
    async fn currencies(&self) -> Result<Currencies, SourceError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
