//! Currency conversion records.

use chrono::{DateTime, Utc};
use fxdash_core::error::{FxError, FxResult};
use fxdash_core::types::{is_valid_rate, CurrencyCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Amount used when the requested one is not a finite, non-negative number.
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// Decimal places kept on converted amounts.
pub const RESULT_DECIMALS: u32 = 4;

/// One completed conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub id: Uuid,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: Decimal,
    pub rate: f64,
    pub result: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Conversion {
    /// Convert `amount` at `rate`.
    ///
    /// Fails with `RateUnavailable` if the rate is unusable and with
    /// `AmountOutOfRange` if the amount or result does not fit a decimal.
    pub fn new(from: CurrencyCode, to: CurrencyCode, amount: f64, rate: f64) -> FxResult<Self> {
        if !is_valid_rate(rate) {
            return Err(FxError::RateUnavailable { from, to });
        }

        let rate_dec = Decimal::try_from(rate).map_err(|_| FxError::RateUnavailable { from, to })?;
        let out_of_range = || FxError::AmountOutOfRange(amount);
        let amount = Decimal::try_from(amount).map_err(|_| out_of_range())?;
        let result = amount
            .checked_mul(rate_dec)
            .ok_or_else(out_of_range)?
            .round_dp(RESULT_DECIMALS);

        Ok(Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            rate,
            result,
            timestamp: Utc::now(),
        })
    }
}
