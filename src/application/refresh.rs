// Refresh controller - Periodic reload of the active section
use crate::application::dashboard_service::DashboardService;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Handle to a running refresh loop. Shutting down or dropping it stops the timer
/// and abandons a tick that is still loading.
pub struct RefreshHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Cancel and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Refresh task ended abnormally");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub struct RefreshController;

impl RefreshController {
    pub fn spawn(dashboard: DashboardService, period: Duration) -> RefreshHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(refresh_loop(dashboard, period, cancel.clone()));
        RefreshHandle {
            cancel,
            task: Some(task),
        }
    }
}

async fn refresh_loop(dashboard: DashboardService, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick
    tracing::info!(period_secs = period.as_secs(), "Auto-refresh started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // A cancelled tick is dropped before it can write state
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = dashboard.tick() => {
                        if let Err(e) = result {
                            tracing::debug!(error = %e, "Timer refresh failed, keeping last good state");
                        }
                    }
                }
            }
        }
    }

    tracing::info!("Auto-refresh stopped");
}
