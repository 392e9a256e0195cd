//! Core traits for the forex dashboard.

mod indicator;
mod rate_source;

pub use indicator::{clamp_period, Indicator, MAX_PERIOD, MIN_PERIOD};
pub use rate_source::RateSource;
