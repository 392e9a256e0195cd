//! Shared dashboard state.
//!
//! The selection and the latest snapshot live in `watch` channels: readers
//! either poll the current value or subscribe to changes, and only the most
//! recent value is kept.
//!
//! Refreshes are tagged with monotonically increasing tokens. A snapshot is
//! applied only when its token is newer than the last applied one, so a slow
//! response for an old selection never overwrites a fresher one.

use fxdash_core::types::CurrencyCode;
use fxdash_data::MarketSnapshot;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

const MAX_MESSAGES: usize = 50;

/// What the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub base: CurrencyCode,
    /// Empty means every currency
    pub symbols: Vec<CurrencyCode>,
    /// Case-insensitive code/name filter applied to rows
    pub filter: String,
}

impl Selection {
    pub fn new(base: CurrencyCode, symbols: Vec<CurrencyCode>) -> Self {
        Self {
            base,
            symbols,
            filter: String::new(),
        }
    }
}

/// Identifies one refresh. Later refreshes carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

/// Dashboard state shared between the refresh task and the TUI.
pub struct DashboardStore {
    selection: watch::Sender<Selection>,
    snapshot: watch::Sender<Option<Arc<MarketSnapshot>>>,
    next_token: AtomicU64,
    applied: Mutex<u64>,
    messages: Mutex<VecDeque<String>>,
}

impl DashboardStore {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection: watch::Sender::new(selection),
            snapshot: watch::Sender::new(None),
            next_token: AtomicU64::new(1),
            applied: Mutex::new(0),
            messages: Mutex::new(VecDeque::with_capacity(MAX_MESSAGES)),
        }
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection.borrow().clone()
    }

    /// Receiver notified on every selection change.
    pub fn subscribe_selection(&self) -> watch::Receiver<Selection> {
        self.selection.subscribe()
    }

    /// Change the base currency. Subscribers are only notified on an actual change.
    pub fn set_base(&self, base: CurrencyCode) {
        self.selection.send_if_modified(|sel| {
            let changed = sel.base != base;
            sel.base = base;
            changed
        });
    }

    pub fn set_symbols(&self, symbols: Vec<CurrencyCode>) {
        self.selection.send_if_modified(|sel| {
            let changed = sel.symbols != symbols;
            sel.symbols = symbols;
            changed
        });
    }

    pub fn set_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.selection.send_if_modified(|sel| {
            let changed = sel.filter != filter;
            sel.filter = filter;
            changed
        });
    }

    /// Start a refresh.
    pub fn begin_refresh(&self) -> RefreshToken {
        RefreshToken(self.next_token.fetch_add(1, Ordering::SeqCst))
    }

    /// Apply the result of the refresh identified by `token`.
    ///
    /// Returns `false`, leaving the current snapshot in place, when a newer
    /// refresh has already been applied.
    pub fn publish(&self, token: RefreshToken, snapshot: MarketSnapshot) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if token.0 <= *applied {
            debug!(token = token.0, applied = *applied, "discarding stale snapshot");
            return false;
        }
        *applied = token.0;
        self.snapshot.send_replace(Some(Arc::new(snapshot)));
        true
    }

    /// Most recently applied snapshot.
    pub fn latest_snapshot(&self) -> Option<Arc<MarketSnapshot>> {
        self.snapshot.borrow().clone()
    }

    /// Stream of applied snapshots, starting with the current one.
    pub fn snapshots(&self) -> WatchStream<Option<Arc<MarketSnapshot>>> {
        WatchStream::new(self.snapshot.subscribe())
    }

    /// Append a status line shown in the dashboard log pane.
    pub fn push_message(&self, message: impl Into<String>) {
        let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        if messages.len() == MAX_MESSAGES {
            messages.pop_front();
        }
        messages.push_back(message.into());
    }

    /// Status lines, oldest first.
    pub fn messages(&self) -> Vec<String> {
        let messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        messages.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn store() -> DashboardStore {
        DashboardStore::new(Selection::new(CurrencyCode::EUR, vec![CurrencyCode::USD]))
    }

    fn snapshot(base: CurrencyCode) -> MarketSnapshot {
        MarketSnapshot::empty(base)
    }

    #[test]
    fn test_tokens_increase() {
        let store = store();
        let a = store.begin_refresh();
        let b = store.begin_refresh();
        assert!(b > a);
    }

    #[test]
    fn test_stale_snapshot_is_discarded() {
        let store = store();
        let old = store.begin_refresh();
        let new = store.begin_refresh();

        assert!(store.publish(new, snapshot(CurrencyCode::USD)));
        assert!(!store.publish(old, snapshot(CurrencyCode::EUR)));
        assert_eq!(store.latest_snapshot().unwrap().base, CurrencyCode::USD);

        // Same token twice is also stale
        assert!(!store.publish(new, snapshot(CurrencyCode::GBP)));
    }

    #[test]
    fn test_in_order_snapshots_apply() {
        let store = store();
        assert!(store.latest_snapshot().is_none());

        let first = store.begin_refresh();
        assert!(store.publish(first, snapshot(CurrencyCode::EUR)));
        let second = store.begin_refresh();
        assert!(store.publish(second, snapshot(CurrencyCode::GBP)));
        assert_eq!(store.latest_snapshot().unwrap().base, CurrencyCode::GBP);
    }

    #[tokio::test]
    async fn test_selection_subscribers_see_changes() {
        let store = store();
        let mut rx = store.subscribe_selection();

        store.set_filter("us");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().filter, "us");

        // Unchanged value does not notify
        store.set_filter("us");
        assert!(!rx.has_changed().unwrap());

        store.set_base(CurrencyCode::GBP);
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.selection().base, CurrencyCode::GBP);
    }

    #[tokio::test]
    async fn test_snapshot_stream() {
        let store = store();
        let mut stream = store.snapshots();
        assert!(stream.next().await.unwrap().is_none());

        let token = store.begin_refresh();
        store.publish(token, snapshot(CurrencyCode::CHF));
        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(next.base, CurrencyCode::CHF);
    }

    #[test]
    fn test_messages_are_bounded() {
        let store = store();
        for i in 0..(MAX_MESSAGES + 5) {
            store.push_message(format!("line {}", i));
        }
        let messages = store.messages();
        assert_eq!(messages.len(), MAX_MESSAGES);
        assert_eq!(messages[0], "line 5");
    }
}
