//! Live dashboard command.

use anyhow::{Context, Result};
use fxdash_monitor::{
    refresh_once, AutoRefresh, Dashboard, DashboardEvent, DashboardState, DashboardStore, Debouncer, Selection,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::{AppContext, WatchArgs};

const REDRAW_MS: u64 = 250;

pub async fn run(args: WatchArgs, ctx: AppContext) -> Result<()> {
    let (base, symbols) = ctx.market(&args.market);
    let interval = Duration::from_secs(
        args.interval
            .unwrap_or(ctx.config.dashboard.refresh_interval_secs)
            .max(1),
    );
    info!("Starting dashboard for {} ({} symbols, refresh every {:?})", base, symbols.len(), interval);

    let store = Arc::new(DashboardStore::new(Selection::new(base, symbols)));
    store.push_message(format!("Watching {} (refresh every {}s)", base, interval.as_secs()));
    let names = Arc::new(ctx.service.currencies().await);

    // Periodic refresh, first run immediately
    let auto_refresh = {
        let service = ctx.service.clone();
        let store = store.clone();
        AutoRefresh::spawn(interval, move || {
            let service = service.clone();
            let store = store.clone();
            async move {
                refresh_once(&service, &store).await;
            }
        })
    };

    // Filter edits are applied once typing pauses
    let (debouncer, mut filter_rx) = Debouncer::new(
        Duration::from_millis(ctx.config.dashboard.debounce_ms),
        Handle::current(),
    );
    let filter_task = {
        let store = store.clone();
        tokio::spawn(async move {
            while let Some(filter) = filter_rx.recv().await {
                store.set_filter(filter);
            }
        })
    };

    // Manual refreshes; stale results lose to newer ones in the store
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<()>();
    let manual_task = {
        let service = ctx.service.clone();
        let store = store.clone();
        tokio::spawn(async move {
            while refresh_rx.recv().await.is_some() {
                store.push_message("Refreshing...");
                refresh_once(&service, &store).await;
            }
        })
    };

    let ui_store = store.clone();
    let result = tokio::task::spawn_blocking(move || {
        let dashboard = Dashboard::new(REDRAW_MS);
        dashboard.run(
            || DashboardState {
                snapshot: ui_store.latest_snapshot(),
                selection: ui_store.selection(),
                names: names.clone(),
                messages: ui_store.messages(),
            },
            |event| match event {
                DashboardEvent::FilterChanged(filter) => debouncer.push(filter),
                DashboardEvent::RefreshRequested => {
                    let _ = refresh_tx.send(());
                }
            },
        )
    })
    .await
    .context("Dashboard thread panicked")?;

    auto_refresh.cancel();
    filter_task.abort();
    manual_task.abort();

    result.context("Dashboard terminal error")?;
    info!("Dashboard closed");
    Ok(())
}
