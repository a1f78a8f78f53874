use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::EngineApi;

const LOG_TARGET: &str = "game::monitor";

/// Periodic liveness probe of the auxiliary automated-opponent service.
/// Publishes online/offline over a watch channel; a failed probe reads as
/// offline and is never fatal.
pub struct OpponentServiceMonitor {
    api: Arc<dyn EngineApi>,
    poll_interval: Duration,
    tx: watch::Sender<bool>,
}

impl OpponentServiceMonitor {
    pub fn new(
        api: Arc<dyn EngineApi>,
        poll_interval: Duration,
    ) -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                api,
                poll_interval,
                tx,
            },
            rx,
        )
    }

    pub async fn run(self, stop: CancellationToken) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop.cancelled() => {
                    debug!(target = LOG_TARGET, "shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    let online = self.api.opponent_service_online().await;
                    let changed = self.tx.send_if_modified(|current| {
                        if *current == online {
                            false
                        } else {
                            *current = online;
                            true
                        }
                    });
                    if changed {
                        info!(target = LOG_TARGET, online, "opponent service status changed");
                    }
                }
            }
        }
    }
}
