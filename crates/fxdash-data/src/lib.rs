//! Data access for the forex dashboard.
//!
//! This crate provides:
//! - A TTL rate cache with bounded size
//! - The Frankfurter upstream source over a pluggable HTTP transport
//! - Retry with exponential backoff
//! - [`RateService`], the cache-fronted entry point used by the CLI and TUI
//! - Conversions, persisted preferences and CSV/JSON export

pub mod cache;
pub mod conversion;
pub mod export;
pub mod frankfurter;
pub mod preferences;
pub mod retry;
pub mod service;
pub mod transport;

pub use cache::{build_key, CacheKind, RateCache};
pub use conversion::Conversion;
pub use export::{export_rows, filter_rows, to_csv, to_json, ExportRow};
pub use frankfurter::FrankfurterSource;
pub use preferences::{PreferenceStore, Preferences};
pub use retry::{retry, RetryPolicy};
pub use service::{MarketSnapshot, RateService, ServiceConfig};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
