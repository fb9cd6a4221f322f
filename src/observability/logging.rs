//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Emit one latency record per completed probe
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::polling::handler::{HandlerError, StatusHandler};
use crate::polling::job::PollingJob;
use crate::polling::types::JobState;

/// Install the global tracing subscriber.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("phi_monitor={},latency=info,phi=info", config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Formats the latency record for a terminal job: `host, nanos` on success,
/// `host, reason` on error. `None` for jobs still running.
pub fn latency_record(job: &PollingJob) -> Option<String> {
    match job.state() {
        JobState::Finished => job
            .duration()
            .map(|d| format!("{}, {}", job.host(), d.as_nanos())),
        JobState::Error => Some(format!(
            "{}, {}",
            job.host(),
            job.error().unwrap_or("-")
        )),
        JobState::NotStarted | JobState::Started => None,
    }
}

/// Writes latency records to the `latency` log target.
#[derive(Debug, Default)]
pub struct LatencyLogHandler;

impl StatusHandler for LatencyLogHandler {
    fn name(&self) -> &str {
        "latency-log"
    }

    fn on_job_status(&self, job: &PollingJob) -> Result<(), HandlerError> {
        if let Some(record) = latency_record(job) {
            tracing::info!(target: "latency", "{}", record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::job::StatusListener;
    use crate::polling::types::Host;
    use std::sync::Arc;
    use std::time::Duration;

    struct Ignore;

    impl StatusListener for Ignore {
        fn on_status_change(&self, _job: &PollingJob) {}
    }

    fn job() -> PollingJob {
        PollingJob::new(Host::new("web-3", "127.0.0.1".parse().unwrap()), Arc::new(Ignore))
    }

    #[test]
    fn test_record_for_finished_job() {
        let mut job = job();
        assert!(latency_record(&job).is_none());
        job.start().unwrap();
        assert!(latency_record(&job).is_none());

        let stop = job.started_at().unwrap() + Duration::from_nanos(1500);
        job.finish_at(stop).unwrap();
        assert_eq!(latency_record(&job).as_deref(), Some("web-3, 1500"));
    }

    #[test]
    fn test_record_for_failed_job() {
        let mut job = job();
        job.start().unwrap();
        job.fail("unreachable").unwrap();
        assert_eq!(latency_record(&job).as_deref(), Some("web-3, unreachable"));
    }
}
