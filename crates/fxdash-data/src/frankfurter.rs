//! Frankfurter API rate source.
//!
//! Serves reference rates as `{ base, date, rates }`, time series as
//! `{ base, start_date, end_date, rates: { date: { code: rate } } }` and a
//! `{ code: name }` currency list.

use async_trait::async_trait;
use chrono::NaiveDate;
use fxdash_core::error::SourceError;
use fxdash_core::sanitize::{sanitize_currencies, sanitize_rate_point, sanitize_time_series, DATE_FORMAT};
use fxdash_core::traits::RateSource;
use fxdash_core::types::{Currencies, CurrencyCode, RatePoint, TimeSeries};
use serde_json::Value;
use tracing::debug;

use crate::transport::HttpTransport;

/// Public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter client over any [`HttpTransport`].
pub struct FrankfurterSource<T> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> FrankfurterSource<T> {
    /// Create a source. A trailing slash on `base_url` is ignored.
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { transport, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rate_query(base: CurrencyCode, symbols: &[CurrencyCode]) -> Vec<(&'static str, String)> {
        let mut params = vec![("base", base.to_string())];
        if !symbols.is_empty() {
            let joined = symbols.iter().map(CurrencyCode::as_str).collect::<Vec<_>>().join(",");
            params.push(("symbols", joined));
        }
        params
    }

    async fn fetch_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "requesting rates");

        let resp = self.transport.get(&url, query).await?;
        if !resp.is_success() {
            return Err(SourceError::Status {
                status: resp.status,
                body: resp.body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&resp.body).map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl<T: HttpTransport> RateSource for FrankfurterSource<T> {
    async fn latest(&self, base: CurrencyCode, symbols: &[CurrencyCode]) -> Result<RatePoint, SourceError> {
        let payload = self.fetch_json("latest", &Self::rate_query(base, symbols)).await?;
        sanitize_rate_point(&payload, base)
    }

    async fn historical(
        &self,
        date: NaiveDate,
        base: CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> Result<RatePoint, SourceError> {
        let path = date.format(DATE_FORMAT).to_string();
        let payload = self.fetch_json(&path, &Self::rate_query(base, symbols)).await?;
        sanitize_rate_point(&payload, base)
    }

    async fn time_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> Result<TimeSeries, SourceError> {
        if start > end {
            return Err(SourceError::InvalidRequest(format!("start {} is after end {}", start, end)));
        }

        let path = format!("{}..{}", start.format(DATE_FORMAT), end.format(DATE_FORMAT));
        let payload = self.fetch_json(&path, &Self::rate_query(base, symbols)).await?;
        sanitize_time_series(&payload, base, start, end)
    }

    async fn currencies(&self) -> Result<Currencies, SourceError> {
        let payload = self.fetch_json("currencies", &[]).await?;
        sanitize_currencies(&payload)
    }

    fn name(&self) -> &str {
        "Frankfurter"
    }
}
