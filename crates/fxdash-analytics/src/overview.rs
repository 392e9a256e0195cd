//! Per-currency dashboard rows built from several rate payloads.

use fxdash_core::types::{is_valid_rate, CurrencyCode, RatePoint, TimeSeries};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::statistics::{percent_change, SeriesMetrics};
use crate::strength::{strength_score, CurrencyStrength};

/// Change of one rate between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateChange {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl RateChange {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            change: current - previous,
            change_percent: percent_change(current, previous),
        }
    }
}

/// Change for `code` between two rate points, if both carry a valid rate.
///
/// Points quoted against different bases are not comparable and give `None`.
/// Only published rates count; the implicit 1.0 of the base does not.
pub fn rate_change(code: CurrencyCode, latest: &RatePoint, previous: &RatePoint) -> Option<RateChange> {
    if previous.base != latest.base {
        return None;
    }
    let current = latest.rates.get(&code).copied().filter(|r| is_valid_rate(*r))?;
    let prior = previous.rates.get(&code).copied().filter(|r| is_valid_rate(*r))?;
    Some(RateChange::new(current, prior))
}

/// Percent change from the first valid value of a series to `current`.
fn change_since_start(code: CurrencyCode, current: f64, series: &TimeSeries) -> Option<f64> {
    series.first_rate(code).map(|first| percent_change(current, first))
}

/// `series` if it is quoted against `base`; otherwise it carries no data.
fn same_base(series: &TimeSeries, base: CurrencyCode) -> Option<&TimeSeries> {
    (series.base == base).then_some(series)
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyOverview {
    pub code: CurrencyCode,
    /// Latest rate against the base currency
    pub rate: f64,
    pub change_24h: Option<RateChange>,
    /// Percent change over the weekly series
    pub change_7d: Option<f64>,
    /// Percent change over the monthly series
    pub change_30d: Option<f64>,
    pub strength: Option<CurrencyStrength>,
    /// Metrics over the monthly series
    pub metrics: Option<SeriesMetrics>,
}

impl CurrencyOverview {
    /// Convenience accessor for the 24h percent change.
    pub fn change_percent_24h(&self) -> Option<f64> {
        self.change_24h.map(|c| c.change_percent)
    }
}

/// Build one row per currency in `latest`.
///
/// Each payload may be empty; missing inputs leave the matching fields `None`
/// and count as 0 in the strength score. Payloads quoted against another base
/// (the fallbacks, typically) count as missing.
pub fn build_overview(
    latest: &RatePoint,
    previous: &RatePoint,
    weekly: &TimeSeries,
    monthly: &TimeSeries,
) -> Vec<CurrencyOverview> {
    let weekly = same_base(weekly, latest.base);
    let monthly = same_base(monthly, latest.base);

    latest
        .iter()
        .filter(|(_, rate)| is_valid_rate(*rate))
        .map(|(code, rate)| {
            let change_24h = rate_change(code, latest, previous);
            let change_7d = weekly.and_then(|s| change_since_start(code, rate, s));
            let change_30d = monthly.and_then(|s| change_since_start(code, rate, s));
            let strength = strength_score(change_24h.map(|c| c.change_percent), change_7d, change_30d);
            let metrics = monthly.and_then(|s| SeriesMetrics::from_series(&s.values_for(code)));

            CurrencyOverview {
                code,
                rate,
                change_24h,
                change_7d,
                change_30d,
                strength,
                metrics,
            }
        })
        .collect()
}

/// Sort rows by strength score, strongest first. Rows without a score go last.
pub fn rank_by_strength(rows: &mut [CurrencyOverview]) {
    rows.sort_by(|a, b| match (a.strength, b.strength) {
        (Some(a), Some(b)) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
