//! Range statistics, volatility and trend over rate series.
//!
//! Every function here works on the valid subset of its input (finite,
//! positive values). A statistic over zero valid values is `None`, never
//! zero and never `NaN`.

use fxdash_core::types::is_valid_rate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage change from `previous` to `current`.
///
/// Returns 0 when `previous` is 0 or the result is not finite.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let change = (current - previous) / previous * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Collect the valid values of a series, preserving order.
pub fn valid_values(series: &[f64]) -> Vec<f64> {
    series.iter().copied().filter(|v| is_valid_rate(*v)).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// High, low and mean of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeStatistics {
    /// Highest valid value
    pub high: f64,
    /// Lowest valid value
    pub low: f64,
    /// Arithmetic mean of valid values
    pub mean: f64,
}

/// Compute high, low and mean, or `None` for a series without valid values.
pub fn range_statistics(series: &[f64]) -> Option<RangeStatistics> {
    let values = valid_values(series);
    if values.is_empty() {
        return None;
    }

    let high = values.iter().copied().fold(f64::MIN, f64::max);
    let low = values.iter().copied().fold(f64::MAX, f64::min);

    Some(RangeStatistics {
        high,
        low,
        mean: mean(&values),
    })
}

/// Coefficient of variation in percent: population stddev / mean * 100.
///
/// `None` with fewer than two valid points or a zero/non-finite mean.
pub fn volatility(series: &[f64]) -> Option<f64> {
    let values = valid_values(series);
    if values.len() < 2 {
        return None;
    }

    let mean = mean(&values);
    if mean == 0.0 || !mean.is_finite() {
        return None;
    }

    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let result = variance.sqrt() / mean * 100.0;
    result.is_finite().then_some(result)
}

/// Direction of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// Threshold between halves before a move counts as a trend (1%).
const TREND_THRESHOLD: f64 = 0.01;

/// Compare the mean of the second half of the valid values to the first half.
///
/// The split point is `len / 2`. `None` with fewer than two valid points.
pub fn trend(series: &[f64]) -> Option<Trend> {
    let values = valid_values(series);
    if values.len() < 2 {
        return None;
    }

    let mid = values.len() / 2;
    let first = mean(&values[..mid]);
    let second = mean(&values[mid..]);

    if second > first * (1.0 + TREND_THRESHOLD) {
        Some(Trend::Up)
    } else if second < first * (1.0 - TREND_THRESHOLD) {
        Some(Trend::Down)
    } else {
        Some(Trend::Neutral)
    }
}

/// Derived metrics for one rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetrics {
    pub high: f64,
    pub low: f64,
    pub average: f64,
    /// Last valid value minus first valid value
    pub change: f64,
    /// `change / first * 100`
    pub change_percent: f64,
    pub volatility: Option<f64>,
    pub trend: Option<Trend>,
}

impl SeriesMetrics {
    /// Compute all metrics, or `None` for a series without valid values.
    pub fn from_series(series: &[f64]) -> Option<Self> {
        let range = range_statistics(series)?;
        let values = valid_values(series);
        let first = *values.first()?;
        let last = *values.last()?;

        Some(Self {
            high: range.high,
            low: range.low,
            average: range.mean,
            change: last - first,
            change_percent: percent_change(last, first),
            volatility: volatility(&values),
            trend: trend(&values),
        })
    }
}
