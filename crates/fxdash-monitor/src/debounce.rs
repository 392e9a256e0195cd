//! Trailing-edge debouncer.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default quiet period before a value is delivered.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delivers only the last value pushed within a quiet period.
///
/// Each [`push`](Debouncer::push) aborts the pending timer and starts a new
/// one, so earlier values in the window are dropped. Timers run on the given
/// runtime handle, which lets a blocking UI thread push values.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
    runtime: Handle,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver its values are delivered to.
    pub fn new(delay: Duration, runtime: Handle) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: Mutex::new(None),
            runtime,
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing any value still waiting.
    pub fn push(&self, value: T) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        let tx = self.tx.clone();
        let delay = self.delay;
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means nobody is listening any more
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_in_window_is_delivered() {
        let (debouncer, mut rx) = Debouncer::new(DEFAULT_DEBOUNCE, Handle::current());

        debouncer.push("u");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("us");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("usd");

        assert_eq!(rx.recv().await, Some("usd"));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_values_outside_window_are_all_delivered() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(300), Handle::current());

        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.push(2);

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (debouncer, mut rx) = Debouncer::new(DEFAULT_DEBOUNCE, Handle::current());

        debouncer.push(7);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_from_blocking_thread() {
        let (debouncer, mut rx) = Debouncer::new(DEFAULT_DEBOUNCE, Handle::current());

        let debouncer = tokio::task::spawn_blocking(move || {
            debouncer.push("eur".to_string());
            debouncer
        })
        .await
        .unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("eur"));
        drop(debouncer);
    }
}
