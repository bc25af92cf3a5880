//! Background risk monitoring task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::risk_manager::RiskManager;

/// Recurring sweep over the ledger while the system is active.
///
/// Each tick runs one [`RiskManager::run_risk_cycle`] under the same ledger
/// lock the foreground uses. Shutdown is cooperative: the flag is observed
/// between cycles, so a sweep that has started always finishes before the
/// task exits.
pub struct RiskMonitor {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RiskMonitor {
    /// Spawn the monitor on the current tokio runtime.
    pub fn spawn(manager: Arc<RiskManager>, period: Duration) -> Self {
        let (shutdown, mut stop_signal) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if *stop_signal.borrow() {
                            break;
                        }
                        manager.run_risk_cycle();
                    }
                    changed = stop_signal.changed() => {
                        if changed.is_err() || *stop_signal.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("risk monitor loop exited");
        });

        info!(period_secs = period.as_secs(), "risk monitor started");
        Self { shutdown, handle }
    }

    /// Check whether the monitor task is still alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the monitor and wait for it to wind down.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.handle.await {
            warn!(%err, "risk monitor task did not shut down cleanly");
        }
        info!("risk monitor stopped");
    }
}
