//! Periodic dashboard refresh.
//!
//! The poller runs in a spawned Tokio task: it fetches the dashboard once
//! right away and then on every tick, sending each outcome back through an
//! MPSC channel. A failed fetch is reported and polling carries on; the next
//! tick is the only retry.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiResult};
use crate::models::DashboardAnalytics;

/// Refresh period used by the dashboard view
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Shortest period accepted; shorter ones, zero included, are raised to it
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Buffer size for the result channel
const CHANNEL_BUFFER_SIZE: usize = 8;

pub type DashboardResult = ApiResult<DashboardAnalytics>;

/// Handle to a running dashboard refresh task. Dropping it stops the task.
pub struct DashboardPoller {
    handle: JoinHandle<()>,
}

impl DashboardPoller {
    /// Start polling. Must be called from within a Tokio runtime.
    pub fn spawn(client: ApiClient, period: Duration) -> (Self, mpsc::Receiver<DashboardResult>) {
        let period = clamp_period(period);
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let handle = tokio::spawn(Self::run(client, period, tx));
        (Self { handle }, rx)
    }

    /// Stop polling. Results already queued stay readable.
    pub fn stop(&self) {
        self.handle.abort();
    }

    async fn run(client: ApiClient, period: Duration, tx: mpsc::Sender<DashboardResult>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // The first tick completes immediately
            ticker.tick().await;
            debug!("Refreshing dashboard analytics");

            let result = client.analytics().dashboard().await;
            if let Err(e) = &result {
                warn!(status = e.status(), error = %e, "Dashboard refresh failed");
            }

            if tx.send(result).await.is_err() {
                debug!("Dashboard receiver dropped, stopping poller");
                return;
            }
        }
    }
}

fn clamp_period(period: Duration) -> Duration {
    if period < MIN_REFRESH_PERIOD {
        warn!(?period, minimum = ?MIN_REFRESH_PERIOD, "Refresh period too short, raising it");
        return MIN_REFRESH_PERIOD;
    }
    period
}

impl Drop for DashboardPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_period() {
        assert_eq!(clamp_period(Duration::ZERO), MIN_REFRESH_PERIOD);
        assert_eq!(clamp_period(Duration::from_millis(20)), MIN_REFRESH_PERIOD);
        assert_eq!(clamp_period(DEFAULT_REFRESH_PERIOD), DEFAULT_REFRESH_PERIOD);
    }
}
