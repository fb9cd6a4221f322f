//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define monitor metrics (probe outcomes, latency, φ, active monitors)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `phi_monitor_probes_total` (counter): probes by host, outcome
//! - `phi_monitor_probe_duration_seconds` (histogram): probe latency by host
//! - `phi_monitor_phi` (gauge): last reported φ by host
//! - `phi_monitor_mean_interval_seconds` (gauge): mean inter-arrival by host
//! - `phi_monitor_active_monitors` (gauge): monitors in flight
//! - `phi_monitor_handler_failures_total` (counter): by handler
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels for host and outcome only

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::polling::handler::{HandlerError, StatusHandler};
use crate::polling::job::PollingJob;
use crate::polling::types::JobState;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe(host: &str, outcome: &'static str, duration: Duration) {
    metrics::counter!(
        "phi_monitor_probes_total",
        "host" => host.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("phi_monitor_probe_duration_seconds", "host" => host.to_string())
        .record(duration.as_secs_f64());
}

pub fn record_phi(host: &str, phi: f64, mean_interval: Duration) {
    metrics::gauge!("phi_monitor_phi", "host" => host.to_string()).set(phi);
    metrics::gauge!("phi_monitor_mean_interval_seconds", "host" => host.to_string())
        .set(mean_interval.as_secs_f64());
}

pub fn record_active_monitors(count: usize) {
    metrics::gauge!("phi_monitor_active_monitors").set(count as f64);
}

pub fn record_handler_failure(handler: &str) {
    metrics::counter!("phi_monitor_handler_failures_total", "handler" => handler.to_string())
        .increment(1);
}

/// Records probe outcomes for terminal jobs.
#[derive(Debug, Default)]
pub struct MetricsHandler;

impl StatusHandler for MetricsHandler {
    fn name(&self) -> &str {
        "metrics"
    }

    fn on_job_status(&self, job: &PollingJob) -> Result<(), HandlerError> {
        let outcome = match job.state() {
            JobState::Finished => "success",
            JobState::Error => "error",
            JobState::NotStarted | JobState::Started => return Ok(()),
        };
        let duration = job.duration().unwrap_or_default();
        record_probe(job.host().name(), outcome, duration);
        Ok(())
    }
}
