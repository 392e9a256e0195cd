//! ISO-4217 style currency codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FxError;

/// Three-letter uppercase currency code (`^[A-Z]{3}$`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");
    pub const GBP: CurrencyCode = CurrencyCode(*b"GBP");
    pub const JPY: CurrencyCode = CurrencyCode(*b"JPY");
    pub const CHF: CurrencyCode = CurrencyCode(*b"CHF");

    /// Parse a code that must already be exactly three uppercase letters.
    pub fn parse(input: &str) -> Option<Self> {
        let bytes = input.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return None;
        }
        Some(Self([bytes[0], bytes[1], bytes[2]]))
    }

    /// Normalize user input, falling back to `default` when it is not a valid code.
    ///
    /// Surrounding whitespace is trimmed and lowercase letters are accepted.
    pub fn sanitize(input: &str, default: CurrencyCode) -> Self {
        Self::parse(&input.trim().to_ascii_uppercase()).unwrap_or(default)
    }

    /// Sanitize a list of codes, dropping invalid entries and duplicates.
    ///
    /// The result is sorted.
    pub fn sanitize_list<S: AsRef<str>>(inputs: &[S]) -> Vec<Self> {
        let mut codes: Vec<Self> = inputs
            .iter()
            .filter_map(|s| Self::parse(&s.as_ref().trim().to_ascii_uppercase()))
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::EUR
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FxError::InvalidCurrency(s.to_string()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}
