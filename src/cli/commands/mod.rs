//! CLI command implementations.

pub mod convert;
pub mod currencies;
pub mod export;
pub mod favorites;
pub mod history;
pub mod latest;
pub mod overview;
pub mod series;
pub mod validate;
pub mod watch;

/// Format an optional percentage for tables.
pub(crate) fn pct(value: Option<f64>) -> String {
    value.map(|v| format!("{:+.2}%", v)).unwrap_or_else(|| "-".to_string())
}
