//! Periodic dashboard refresh.

use chrono::Utc;
use fxdash_data::RateService;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::store::DashboardStore;

/// Default refresh period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Re-run the overview for the current selection and publish it.
///
/// Returns whether the snapshot was applied; it is discarded if a newer
/// refresh finished first.
pub async fn refresh_once(service: &RateService, store: &DashboardStore) -> bool {
    let token = store.begin_refresh();
    let selection = store.selection();
    let today = Utc::now().date_naive();

    let snapshot = service.overview(selection.base, &selection.symbols, today).await;
    let rows = snapshot.rows.len();
    let applied = store.publish(token, snapshot);

    if applied {
        info!(base = %selection.base, rows, "dashboard refreshed");
        if rows == 0 {
            store.push_message(format!("No rates available for {}", selection.base));
        } else {
            store.push_message(format!(
                "Refreshed {} rates for {} at {}",
                rows,
                selection.base,
                Utc::now().format("%H:%M:%S")
            ));
        }
    }
    applied
}

/// Fixed-interval background task. Stops on [`cancel`](AutoRefresh::cancel)
/// or when dropped.
pub struct AutoRefresh {
    task: JoinHandle<()>,
    interval: Duration,
}

impl AutoRefresh {
    /// Spawn a task running `tick` immediately and then every `interval`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F, Fut>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                tick().await;
            }
        });

        Self { task, interval: period }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the task.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Selection;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use fxdash_core::error::SourceError;
    use fxdash_core::traits::RateSource;
    use fxdash_core::types::{Currencies, CurrencyCode, RatePoint, TimeSeries};
    use fxdash_data::ServiceConfig;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FlatSource;

    #[async_trait]
    impl RateSource for FlatSource {
        async fn latest(&self, base: CurrencyCode, _symbols: &[CurrencyCode]) -> Result<RatePoint, SourceError> {
            Ok(RatePoint::new(base, None, BTreeMap::from([(CurrencyCode::USD, 1.1)])))
        }

        async fn historical(
            &self,
            date: NaiveDate,
            base: CurrencyCode,
            _symbols: &[CurrencyCode],
        ) -> Result<RatePoint, SourceError> {
            Ok(RatePoint::new(base, Some(date), BTreeMap::from([(CurrencyCode::USD, 1.0)])))
        }

        async fn time_series(
            &self,
            start: NaiveDate,
            end: NaiveDate,
            base: CurrencyCode,
            _symbols: &[CurrencyCode],
        ) -> Result<TimeSeries, SourceError> {
            Ok(TimeSeries::empty(base, start, end))
        }

        async fn currencies(&self) -> Result<Currencies, SourceError> {
            Ok(Currencies::new())
        }

        fn name(&self) -> &str {
            "flat"
        }
    }

    #[tokio::test]
    async fn test_refresh_once_publishes_snapshot() {
        let service = RateService::new(Arc::new(FlatSource), ServiceConfig::default());
        let store = DashboardStore::new(Selection::new(CurrencyCode::EUR, vec![CurrencyCode::USD]));

        assert!(refresh_once(&service, &store).await);
        let snapshot = store.latest_snapshot().unwrap();
        assert_eq!(snapshot.base, CurrencyCode::EUR);
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let refresh = AutoRefresh::spawn(DEFAULT_REFRESH_INTERVAL, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        // First tick is immediate
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        refresh.cancel();
        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL * 3).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(refresh.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let refresh = AutoRefresh::spawn(Duration::from_secs(1), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(refresh);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
