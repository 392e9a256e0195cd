//! Core data types for the forex dashboard.

mod currency;
mod rates;
mod series;

pub use currency::CurrencyCode;
pub use rates::{is_valid_rate, Currencies, RatePoint};
pub use series::TimeSeries;
