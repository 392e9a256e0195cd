//! Derived analytics over exchange-rate data.
//!
//! This crate provides pure functions and indicators used by the dashboard:
//! - Moving averages (MA, EMA) that tolerate gaps in the input
//! - Range statistics, volatility (coefficient of variation) and trend
//! - Weighted currency strength score
//! - Per-currency overview rows combining latest, prior-day and historical rates

pub mod moving_average;
pub mod overview;
pub mod statistics;
pub mod strength;

pub use moving_average::{ExponentialMovingAverage, MovingAverage};
pub use overview::{build_overview, rank_by_strength, rate_change, CurrencyOverview, RateChange};
pub use statistics::{
    percent_change, range_statistics, trend, valid_values, volatility, RangeStatistics, SeriesMetrics, Trend,
};
pub use strength::{strength_score, CurrencyStrength, StrengthClass};
