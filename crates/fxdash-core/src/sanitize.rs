//! Boundary sanitizers for user input and upstream payloads.
//!
//! User input is coerced to safe defaults instead of being rejected.
//! Upstream payloads are checked for their top-level shape (a wrong shape is
//! a [`SourceError::Malformed`]) and then cleaned field by field: entries with
//! malformed codes, dates or non-positive rates are dropped.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::SourceError;
use crate::types::{is_valid_rate, Currencies, CurrencyCode, RatePoint, TimeSeries};

/// Date format used by the upstream API and the CLI.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// First date with published reference rates.
pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1999, 1, 4).unwrap_or(NaiveDate::MIN)
}

const MAX_CURRENCY_NAME_LEN: usize = 64;

/// Replace a non-finite or negative amount with `default`.
pub fn sanitize_amount(amount: f64, default: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        default
    }
}

/// Parse a `YYYY-MM-DD` date within `[earliest_date(), today]`, or return `default`.
pub fn sanitize_date(input: &str, default: NaiveDate, today: NaiveDate) -> NaiveDate {
    match NaiveDate::parse_from_str(input.trim(), DATE_FORMAT) {
        Ok(date) if date >= earliest_date() && date <= today => date,
        _ => default,
    }
}

/// Order a date range and clamp it to `[earliest_date(), today]`.
pub fn sanitize_range(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = earliest_date();
    let clamp = |d: NaiveDate| d.clamp(earliest, today.max(earliest));
    let (start, end) = (clamp(start), clamp(end));
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Keep only entries with a valid code and a positive finite rate.
pub fn sanitize_rates(rates: &Map<String, Value>) -> BTreeMap<CurrencyCode, f64> {
    rates
        .iter()
        .filter_map(|(code, value)| {
            let code = CurrencyCode::parse(code)?;
            let rate = value.as_f64().filter(|r| is_valid_rate(*r))?;
            Some((code, rate))
        })
        .collect()
}

/// Sanitize a `{ base, date, rates }` payload.
pub fn sanitize_rate_point(payload: &Value, fallback_base: CurrencyCode) -> Result<RatePoint, SourceError> {
    let object = payload
        .as_object()
        .ok_or_else(|| SourceError::Malformed("rate payload is not an object".into()))?;
    let rates = object
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::Malformed("rate payload has no rates object".into()))?;

    let base = object
        .get("base")
        .and_then(Value::as_str)
        .and_then(CurrencyCode::parse)
        .unwrap_or(fallback_base);
    let date = object
        .get("date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());

    Ok(RatePoint::new(base, date, sanitize_rates(rates)))
}

/// Sanitize a `{ base, start_date, end_date, rates: { date: { code: rate } } }` payload.
///
/// Requested dates are used when the payload omits or garbles its own range.
pub fn sanitize_time_series(
    payload: &Value,
    fallback_base: CurrencyCode,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TimeSeries, SourceError> {
    let object = payload
        .as_object()
        .ok_or_else(|| SourceError::Malformed("series payload is not an object".into()))?;
    let rates = object
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::Malformed("series payload has no rates object".into()))?;

    let base = object
        .get("base")
        .and_then(Value::as_str)
        .and_then(CurrencyCode::parse)
        .unwrap_or(fallback_base);
    let parse_date = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
    };

    let mut series = TimeSeries::empty(
        base,
        parse_date("start_date").unwrap_or(start),
        parse_date("end_date").unwrap_or(end),
    );

    for (day, day_rates) in rates {
        let Ok(date) = NaiveDate::parse_from_str(day, DATE_FORMAT) else {
            continue;
        };
        let Some(day_rates) = day_rates.as_object() else {
            continue;
        };
        let clean = sanitize_rates(day_rates);
        if !clean.is_empty() {
            series.points.insert(date, clean);
        }
    }

    Ok(series)
}

/// Sanitize a `{ code: name }` currency list.
pub fn sanitize_currencies(payload: &Value) -> Result<Currencies, SourceError> {
    let object = payload
        .as_object()
        .ok_or_else(|| SourceError::Malformed("currency payload is not an object".into()))?;

    Ok(object
        .iter()
        .filter_map(|(code, name)| {
            let code = CurrencyCode::parse(code)?;
            let name: String = name.as_str()?.trim().chars().take(MAX_CURRENCY_NAME_LEN).collect();
            if name.is_empty() {
                return None;
            }
            Some((code, name))
        })
        .collect())
}
