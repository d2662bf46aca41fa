pub mod config;
pub mod telemetry;
pub mod state;
pub mod error;
pub mod domain { pub mod paste; }
pub mod services { pub mod clock; pub mod codec; pub mod housekeeping; pub mod lifecycle; pub mod storage; }
pub mod web { pub mod router; pub mod handlers; pub mod views; }

use std::sync::Arc;
use std::time::Duration;

use crate::services::clock::{Clock, SystemClock};
use crate::services::housekeeping::{self, Sweeper};
use crate::services::lifecycle::PasteManager;
use crate::services::storage::{MemoryStore, PasteStore};
use crate::state::AppState;

/// Wires the router over the given store and clock. Starts the sweeper when
/// `sweep_interval_secs` is non-zero; keep the returned handle alive for as
/// long as it should run.
pub fn build_app_with(
    cfg: &crate::config::Config,
    store: Arc<dyn PasteStore>,
    clock: Arc<dyn Clock>,
) -> (axum::Router, Option<Sweeper>) {
    let pastes = PasteManager::new(store, clock);

    let sweeper = (cfg.sweep_interval_secs > 0).then(|| {
        housekeeping::start_sweeper(pastes.clone(), Duration::from_secs(cfg.sweep_interval_secs))
    });

    let state = AppState { pastes, test_mode: cfg.test_mode };
    (crate::web::router::build_router(state), sweeper)
}

pub fn build_app(cfg: &crate::config::Config) -> (axum::Router, Option<Sweeper>) {
    build_app_with(cfg, Arc::new(MemoryStore::new()), Arc::new(SystemClock))
}
