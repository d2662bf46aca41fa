use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::lifecycle::PasteManager;

pub struct Sweeper {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Sweeper {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

/// Periodically evicts void pastes that nobody has asked for. Fetch keeps
/// enforcing expiry on its own; this only reclaims space.
pub fn start_sweeper(manager: PasteManager, every: Duration) -> Sweeper {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // first tick fires immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => { run_sweep(&manager).await; }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() { break; }
                }
            }
        }
    });
    Sweeper { shutdown_tx, task }
}

// A failed pass counts as zero removed; the next tick tries again.
pub(crate) async fn run_sweep(manager: &PasteManager) -> usize {
    match manager.sweep().await {
        Ok(0) => 0,
        Ok(removed) => {
            info!(removed, "swept void pastes");
            removed
        }
        Err(e) => {
            warn!(error = %e, "sweep failed");
            0
        }
    }
}
