//! Fixed-cadence driver that re-polls every configured host.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::polling::orchestrator::PollingOrchestrator;
use crate::polling::types::Host;

pub struct Scheduler {
    orchestrator: Arc<PollingOrchestrator>,
    hosts: Vec<Host>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<PollingOrchestrator>, hosts: Vec<Host>, interval: Duration) -> Self {
        Self {
            orchestrator,
            hosts,
            interval,
        }
    }

    /// Poll every host once.
    pub fn tick(&self) -> usize {
        tracing::debug!(hosts = self.hosts.len(), "Polling hosts");
        self.hosts
            .iter()
            .filter(|host| self.orchestrator.poll(host))
            .count()
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            hosts = self.hosts.len(),
            interval = ?self.interval,
            "Scheduler starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
