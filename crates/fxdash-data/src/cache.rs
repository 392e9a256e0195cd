//! Bounded, time-expiring response cache.
//!
//! Entries expire `ttl` after insertion and are purged lazily on the first
//! `get` after expiry. When a new key arrives at capacity, the single entry
//! with the oldest insertion time is evicted. Reads do not refresh entries, so
//! this is not an LRU.

use chrono::{NaiveDate, Utc};
use fxdash_core::types::CurrencyCode;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Default capacity.
pub const DEFAULT_MAX_ENTRIES: usize = 100;
/// Keys are truncated to this many bytes.
pub const MAX_KEY_LEN: usize = 256;

/// Sentinel used in keys when every symbol is requested.
const ALL_SYMBOLS: &str = "*";

/// Kind of upstream operation a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Latest,
    Historical,
    TimeSeries,
    Currencies,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKind::Latest => write!(f, "latest"),
            CacheKind::Historical => write!(f, "historical"),
            CacheKind::TimeSeries => write!(f, "timeseries"),
            CacheKind::Currencies => write!(f, "currencies"),
        }
    }
}

/// Build a deterministic cache key.
///
/// Format: `kind|dates|BASE|SYMBOLS`, where `dates` is empty, a single date or
/// `start..end`, and `SYMBOLS` is the sorted, de-duplicated, comma-joined list
/// (or `*` when empty). Symbol order never changes the key.
pub fn build_key(kind: CacheKind, dates: &[NaiveDate], base: CurrencyCode, symbols: &[CurrencyCode]) -> String {
    let dates = dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join("..");

    let mut sorted = symbols.to_vec();
    sorted.sort();
    sorted.dedup();
    let symbols = if sorted.is_empty() {
        ALL_SYMBOLS.to_string()
    } else {
        sorted.iter().map(CurrencyCode::as_str).collect::<Vec<_>>().join(",")
    };

    let mut key = format!("{}|{}|{}|{}", kind, dates, base, symbols);
    // Keys are pure ASCII, so byte truncation is char-safe.
    key.truncate(MAX_KEY_LEN);
    key
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// Unix milliseconds
    inserted_at: i64,
    /// Insertion order, breaks timestamp ties
    sequence: u64,
}

/// Bounded TTL cache keyed by strings.
#[derive(Debug)]
pub struct RateCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl_ms: i64,
    max_entries: usize,
    next_sequence: u64,
}

impl<V: Clone> RateCache<V> {
    /// Create a cache. A capacity of zero is raised to one.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            max_entries: max_entries.max(1),
            next_sequence: 0,
        }
    }

    /// Look up a key using the wall clock.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, now_millis())
    }

    /// Look up a key as of `now` (unix ms). Expired entries are removed.
    pub fn get_at(&mut self, key: &str, now: i64) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now.saturating_sub(entry.inserted_at) < self.ttl_ms {
            debug!(key, "cache hit");
            return Some(entry.value.clone());
        }

        debug!(key, "cache entry expired");
        self.entries.remove(key);
        None
    }

    /// Store a value using the wall clock.
    pub fn put(&mut self, key: String, value: V) {
        self.put_at(key, value, now_millis());
    }

    /// Store a value as of `now` (unix ms), evicting the oldest entry if full.
    pub fn put_at(&mut self, key: String, value: V, now: i64) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                sequence,
            },
        );
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.inserted_at, entry.sequence))
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            debug!(key = %key, "evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }

    /// Remove every expired entry as of `now` (unix ms).
    pub fn purge_expired_at(&mut self, now: i64) {
        let ttl_ms = self.ttl_ms;
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.inserted_at) < ttl_ms);
    }

    /// Remove every expired entry.
    pub fn purge_expired(&mut self) {
        self.purge_expired_at(now_millis());
    }

    /// Check whether a key is stored, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all cached data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl<V: Clone> Default for RateCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
