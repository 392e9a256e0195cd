//! Time series of exchange rates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{is_valid_rate, CurrencyCode};

/// Daily rates for a date range, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Base currency the rates are quoted against
    pub base: CurrencyCode,
    /// First requested date (inclusive)
    pub start_date: NaiveDate,
    /// Last requested date (inclusive)
    pub end_date: NaiveDate,
    /// Rates per publication date
    pub points: BTreeMap<NaiveDate, BTreeMap<CurrencyCode, f64>>,
}

impl TimeSeries {
    /// Create an empty series for the range.
    pub fn empty(base: CurrencyCode, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            base,
            start_date,
            end_date,
            points: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Publication dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.keys().copied().collect()
    }

    /// Values for one currency aligned to [`TimeSeries::dates`].
    ///
    /// Dates without a rate for `code` yield `NaN`, which every statistic
    /// treats as an absent value.
    pub fn values_for(&self, code: CurrencyCode) -> Vec<f64> {
        self.points
            .values()
            .map(|rates| rates.get(&code).copied().unwrap_or(f64::NAN))
            .collect()
    }

    /// First valid rate for `code`, in date order.
    pub fn first_rate(&self, code: CurrencyCode) -> Option<f64> {
        self.points
            .values()
            .filter_map(|rates| rates.get(&code).copied())
            .find(|rate| is_valid_rate(*rate))
    }

    /// Last valid rate for `code`, in date order.
    pub fn last_rate(&self, code: CurrencyCode) -> Option<f64> {
        self.points
            .values()
            .rev()
            .filter_map(|rates| rates.get(&code).copied())
            .find(|rate| is_valid_rate(*rate))
    }

    /// Currencies present on any date.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self
            .points
            .values()
            .flat_map(|rates| rates.keys().copied())
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }
}
