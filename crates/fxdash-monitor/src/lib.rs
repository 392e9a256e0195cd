//! Dashboard state, refresh scheduling and TUI.

mod dashboard;
mod debounce;
mod logging;
mod refresh;
mod store;

pub use dashboard::{Dashboard, DashboardEvent, DashboardState};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use logging::setup_logging;
pub use refresh::{refresh_once, AutoRefresh, DEFAULT_REFRESH_INTERVAL};
pub use store::{DashboardStore, RefreshToken, Selection};
