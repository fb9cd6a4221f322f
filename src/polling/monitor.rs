//! Per-host adaptive monitor loop.
//!
//! # Data Flow
//! ```text
//! MonitorLoop::run
//!     → PollingJob::start (orchestrator notified)
//!     → probe on the blocking pool
//!     → sleep max(min_check_interval, mean interval of host), re-check
//!     → probe returned: finish/fail at the instant it returned
//!       (orchestrator notified, host released)
//! ```
//!
//! # Design Decisions
//! - The check cadence follows each host's observed mean interval, so slow
//!   hosts wake their loop less often
//! - The stop instant is captured on the blocking thread, so job durations
//!   do not depend on the check cadence
//! - A hung probe keeps its loop (and its host slot) occupied; there is no
//!   cancellation at this layer

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::config::schema::PollingConfig;
use crate::detector::registry::FailureDetectorRegistry;
use crate::polling::job::{PollingJob, StatusListener};
use crate::polling::probe::{Probe, ProbeError};
use crate::polling::types::Host;

/// Timing knobs shared by all monitor loops.
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    /// Floor for the completion check interval.
    pub min_check_interval: Duration,
    /// Timeout handed to the probe.
    pub probe_timeout: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            min_check_interval: Duration::from_millis(100),
            probe_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&PollingConfig> for MonitorSettings {
    fn from(config: &PollingConfig) -> Self {
        Self {
            min_check_interval: Duration::from_millis(config.min_check_interval_ms),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        }
    }
}

/// Wait before the next completion check: the host's mean interval, never
/// below `floor`.
pub fn check_interval(floor: Duration, mean_interval_ms: u64) -> Duration {
    floor.max(Duration::from_millis(mean_interval_ms))
}

pub struct MonitorLoop {
    host: Host,
    probe: Arc<dyn Probe>,
    registry: Arc<FailureDetectorRegistry>,
    listener: Arc<dyn StatusListener>,
    settings: MonitorSettings,
}

impl MonitorLoop {
    pub fn new(
        host: Host,
        probe: Arc<dyn Probe>,
        registry: Arc<FailureDetectorRegistry>,
        listener: Arc<dyn StatusListener>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            host,
            probe,
            registry,
            listener,
            settings,
        }
    }

    /// Wait before the next completion check for this loop's host.
    pub fn next_wait(&self) -> Duration {
        check_interval(
            self.settings.min_check_interval,
            self.registry.mean_interval_millis(&self.host),
        )
    }

    /// Drive one job to a terminal state and return it.
    pub async fn run(self) -> PollingJob {
        let mut job = PollingJob::new(self.host.clone(), self.listener.clone());
        let first_wait = self.next_wait();
        tracing::debug!(host = %self.host, interval = ?first_wait, "Monitor started");

        if let Err(e) = job.start() {
            tracing::error!(host = %self.host, error = %e, "Failed to start polling job");
            return job;
        }

        let probe_task = self.spawn_probe();
        let mut wait = first_wait;
        loop {
            tokio::time::sleep(wait).await;
            if probe_task.is_finished() {
                break;
            }
            tracing::trace!(host = %self.host, job = %job, "Probe still running");
            wait = self.next_wait();
        }

        let (outcome, stopped_at) = match probe_task.await {
            Ok(result) => result,
            Err(e) => (Err(ProbeError::Aborted(e.to_string())), Instant::now()),
        };

        let transition = match outcome {
            Ok(()) => job.finish_at(stopped_at),
            Err(e) => job.fail_at(stopped_at, e.to_string()),
        };
        if let Err(e) = transition {
            tracing::error!(host = %self.host, error = %e, "Failed to complete polling job");
        }

        tracing::debug!(job = %job, "Monitor finished");
        job
    }

    fn spawn_probe(&self) -> JoinHandle<(Result<(), ProbeError>, Instant)> {
        let probe = self.probe.clone();
        let host = self.host.clone();
        let timeout = self.settings.probe_timeout;
        tokio::task::spawn_blocking(move || {
            let outcome = probe.probe(&host, timeout);
            (outcome, Instant::now())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::types::JobState;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        states: Mutex<Vec<JobState>>,
    }

    impl StatusListener for Recorder {
        fn on_status_change(&self, job: &PollingJob) {
            self.states.lock().push(job.state());
        }
    }

    fn host() -> Host {
        Host::new("edge-1", "127.0.0.1".parse().unwrap())
    }

    fn settings() -> MonitorSettings {
        MonitorSettings {
            min_check_interval: Duration::from_millis(10),
            probe_timeout: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_check_interval_floor() {
        let floor = Duration::from_millis(100);
        assert_eq!(check_interval(floor, 0), floor);
        assert_eq!(check_interval(floor, 40), floor);
        assert_eq!(check_interval(floor, 1800), Duration::from_millis(1800));
    }

    #[test]
    fn test_cold_host_waits_floor() {
        let registry = Arc::new(FailureDetectorRegistry::new(10, Duration::from_secs(2)));
        let monitor = MonitorLoop::new(
            host(),
            Arc::new(|_: &Host, _: Duration| -> Result<(), ProbeError> { Ok(()) }),
            registry.clone(),
            Arc::new(Recorder::default()),
            MonitorSettings::default(),
        );
        assert_eq!(registry.mean_interval_millis(&host()), 0);
        assert_eq!(monitor.next_wait(), Duration::from_millis(100));

        registry.record_arrival(&host(), Instant::now());
        assert_eq!(monitor.next_wait(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_successful_probe_finishes_job() {
        let recorder = Arc::new(Recorder::default());
        let registry = Arc::new(FailureDetectorRegistry::new(10, Duration::from_secs(2)));
        let probe = |_: &Host, _: Duration| -> Result<(), ProbeError> {
            std::thread::sleep(Duration::from_millis(50));
            Ok(())
        };

        let job = MonitorLoop::new(host(), Arc::new(probe), registry, recorder.clone(), settings())
            .run()
            .await;

        assert_eq!(job.state(), JobState::Finished);
        assert!(job.duration().unwrap() >= Duration::from_millis(50));
        assert_eq!(*recorder.states.lock(), vec![JobState::Started, JobState::Finished]);
    }

    #[tokio::test]
    async fn test_failed_probe_records_error() {
        let recorder = Arc::new(Recorder::default());
        let registry = Arc::new(FailureDetectorRegistry::new(10, Duration::from_secs(2)));
        let probe =
            |_: &Host, timeout: Duration| -> Result<(), ProbeError> { Err(ProbeError::Timeout(timeout)) };

        let job = MonitorLoop::new(host(), Arc::new(probe), registry, recorder.clone(), settings())
            .run()
            .await;

        assert_eq!(job.state(), JobState::Error);
        assert_eq!(job.error(), Some("timed out after 500ms"));
        assert_eq!(*recorder.states.lock(), vec![JobState::Started, JobState::Error]);
    }

    #[tokio::test]
    async fn test_panicking_probe_is_reported_as_error() {
        let registry = Arc::new(FailureDetectorRegistry::new(10, Duration::from_secs(2)));
        let probe = |_: &Host, _: Duration| -> Result<(), ProbeError> { panic!("probe exploded") };

        let job = MonitorLoop::new(
            host(),
            Arc::new(probe),
            registry,
            Arc::new(Recorder::default()),
            settings(),
        )
        .run()
        .await;

        assert_eq!(job.state(), JobState::Error);
        assert!(job.error().unwrap().starts_with("probe aborted"));
    }
}
