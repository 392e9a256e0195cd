//! Point-in-time exchange rates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CurrencyCode;

/// Check whether a value is usable as an exchange rate.
#[inline]
pub fn is_valid_rate(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Exchange rates for one base currency on one date.
///
/// A `date` of `None` means the payload has no date attached yet
/// (an empty fallback, typically).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Base currency the rates are quoted against
    pub base: CurrencyCode,
    /// Publication date reported by the source
    pub date: Option<NaiveDate>,
    /// Units of each currency per one unit of `base`
    pub rates: BTreeMap<CurrencyCode, f64>,
}

impl RatePoint {
    /// Create a rate point with the given rates.
    pub fn new(base: CurrencyCode, date: Option<NaiveDate>, rates: BTreeMap<CurrencyCode, f64>) -> Self {
        Self { base, date, rates }
    }

    /// The "no data" value: no date and no rates.
    pub fn empty(base: CurrencyCode) -> Self {
        Self {
            base,
            date: None,
            rates: BTreeMap::new(),
        }
    }

    /// Rate for a currency. The base currency always quotes at 1.
    pub fn rate(&self, code: CurrencyCode) -> Option<f64> {
        if code == self.base {
            return Some(1.0);
        }
        self.rates.get(&code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Iterate over (code, rate) pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.rates.iter().map(|(code, rate)| (*code, *rate))
    }
}

/// Currency list keyed by code.
pub type Currencies = BTreeMap<CurrencyCode, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_lookup() {
        let mut rates = BTreeMap::new();
        rates.insert(CurrencyCode::USD, 1.1);
        let point = RatePoint::new(CurrencyCode::EUR, None, rates);

        assert_eq!(point.rate(CurrencyCode::USD), Some(1.1));
        assert_eq!(point.rate(CurrencyCode::EUR), Some(1.0));
        assert_eq!(point.rate(CurrencyCode::GBP), None);
    }

    #[test]
    fn test_empty() {
        let point = RatePoint::empty(CurrencyCode::USD);
        assert!(point.is_empty());
        assert_eq!(point.base, CurrencyCode::USD);
        assert!(point.date.is_none());
    }

    #[test]
    fn test_is_valid_rate() {
        assert!(is_valid_rate(0.5));
        assert!(!is_valid_rate(0.0));
        assert!(!is_valid_rate(-1.0));
        assert!(!is_valid_rate(f64::NAN));
        assert!(!is_valid_rate(f64::INFINITY));
    }
}
