//! Error types for the forex dashboard.

use thiserror::Error;

use crate::types::CurrencyCode;

/// Top-level error.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("No rate available for {from} -> {to}")]
    RateUnavailable { from: CurrencyCode, to: CurrencyCode },

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(f64),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upstream rate source errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SourceError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Malformed payloads are retried like transport failures; the upstream
    /// occasionally serves truncated bodies.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Connection(_) | SourceError::Timeout(_) | SourceError::Malformed(_) => true,
            SourceError::Status { status, .. } => *status == 429 || *status >= 500,
            SourceError::InvalidRequest(_) => false,
        }
    }
}

/// Preferences store errors.
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dashboard operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SourceError::Connection("refused".into()).is_retryable());
        assert!(SourceError::Timeout("3s".into()).is_retryable());
        assert!(SourceError::Malformed("not json".into()).is_retryable());
        assert!(SourceError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(SourceError::Status { status: 429, body: String::new() }.is_retryable());
        assert!(!SourceError::Status { status: 404, body: String::new() }.is_retryable());
        assert!(!SourceError::InvalidRequest("bad range".into()).is_retryable());
    }
}
