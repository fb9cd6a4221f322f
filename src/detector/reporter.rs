//! Periodic φ report.
//!
//! Logs `host, nanos since last arrival, φ` for every tracked host, keeps
//! the per-host gauges current and warns when a host crosses the
//! configured threshold. Suspicion is only reported here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time;

use crate::config::schema::DetectorConfig;
use crate::detector::registry::FailureDetectorRegistry;
use crate::observability::metrics;
use crate::polling::types::Host;

pub struct PhiReporter {
    registry: Arc<FailureDetectorRegistry>,
    delay: Duration,
    interval: Duration,
    threshold: f64,
}

impl PhiReporter {
    pub fn new(registry: Arc<FailureDetectorRegistry>, config: &DetectorConfig) -> Self {
        Self {
            registry,
            delay: Duration::from_millis(config.report_delay_ms),
            interval: Duration::from_millis(config.report_interval_ms),
            threshold: config.phi_threshold,
        }
    }

    /// Report every tracked host once; returns hosts at or above the
    /// threshold with their φ.
    pub fn report(&self, now: Instant) -> Vec<(Host, f64)> {
        let mut suspects = Vec::new();

        for (host, stats) in self.registry.snapshot(now) {
            let Some(phi) = stats.phi else {
                continue;
            };
            let since = self
                .registry
                .model(&host)
                .and_then(|model| model.since_last_arrival(now))
                .unwrap_or_default();

            tracing::info!(
                target: "phi",
                "{}, {}, {:.3}",
                host,
                since.as_nanos(),
                phi
            );
            metrics::record_phi(host.name(), phi, Duration::from_millis(stats.mean_interval_ms));

            if phi >= self.threshold {
                tracing::warn!(
                    host = %host,
                    phi = %format_args!("{:.3}", phi),
                    threshold = self.threshold,
                    "Host suspected"
                );
                suspects.push((host, phi));
            }
        }

        suspects
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            delay = ?self.delay,
            interval = ?self.interval,
            threshold = self.threshold,
            "Phi reporter starting"
        );

        let start = time::Instant::now() + self.delay;
        let mut ticker = time::interval_at(start, self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.report(Instant::now());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Phi reporter received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
