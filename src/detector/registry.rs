//! Host → accrual model registry.
//!
//! Shared by every monitor loop: read when sizing the next wait, written
//! whenever a job finishes. Entries are created on first observation and
//! never removed; memory per host is bounded by the window size.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::config::schema::DetectorConfig;
use crate::detector::accrual::ArrivalAccrualModel;
use crate::polling::handler::{HandlerError, StatusHandler};
use crate::polling::job::PollingJob;
use crate::polling::types::{Host, JobState};

/// Point-in-time statistics for one host.
#[derive(Debug, Clone, Serialize)]
pub struct HostStatistics {
    pub host: String,
    pub address: String,
    pub samples: usize,
    pub mean_interval_ms: u64,
    pub since_last_ms: Option<u64>,
    pub phi: Option<f64>,
}

#[derive(Debug)]
pub struct FailureDetectorRegistry {
    models: DashMap<Host, Arc<ArrivalAccrualModel>>,
    window_size: usize,
    seed_interval: Duration,
}

impl FailureDetectorRegistry {
    pub fn new(window_size: usize, seed_interval: Duration) -> Self {
        Self {
            models: DashMap::new(),
            window_size,
            seed_interval,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.window_size, Duration::from_millis(config.max_interval_ms))
    }

    /// Model for `host`, if it has ever been observed.
    pub fn model(&self, host: &Host) -> Option<Arc<ArrivalAccrualModel>> {
        self.models.get(host).map(|entry| entry.value().clone())
    }

    fn model_or_insert(&self, host: &Host) -> Arc<ArrivalAccrualModel> {
        if let Some(model) = self.model(host) {
            return model;
        }
        self.models
            .entry(host.clone())
            .or_insert_with(|| {
                tracing::debug!(host = %host, window = self.window_size, "Tracking new host");
                Arc::new(ArrivalAccrualModel::new(self.window_size, self.seed_interval))
            })
            .value()
            .clone()
    }

    pub fn record_arrival(&self, host: &Host, at: Instant) {
        self.model_or_insert(host).record_arrival(at);
    }

    /// φ for `host` at `now`; `None` while no arrival has been recorded.
    pub fn phi(&self, host: &Host, now: Instant) -> Option<f64> {
        self.model(host)?.phi(now)
    }

    pub fn mean_interval(&self, host: &Host) -> Duration {
        self.model(host)
            .map(|model| model.mean_interval())
            .unwrap_or(Duration::ZERO)
    }

    /// Mean inter-arrival interval in milliseconds, 0 without data.
    pub fn mean_interval_millis(&self, host: &Host) -> u64 {
        self.mean_interval(host).as_millis() as u64
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Statistics for every tracked host, sorted by host name.
    pub fn snapshot(&self, now: Instant) -> Vec<(Host, HostStatistics)> {
        let models: Vec<(Host, Arc<ArrivalAccrualModel>)> = self
            .models
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut stats: Vec<_> = models
            .into_iter()
            .map(|(host, model)| {
                let stats = HostStatistics {
                    host: host.name().to_string(),
                    address: host.addr().to_string(),
                    samples: model.sample_count(),
                    mean_interval_ms: model.mean_interval_millis(),
                    since_last_ms: model
                        .since_last_arrival(now)
                        .map(|d| d.as_millis() as u64),
                    phi: model.phi(now),
                };
                (host, stats)
            })
            .collect();
        stats.sort_by(|a, b| a.0.name().cmp(b.0.name()));
        stats
    }
}

impl StatusHandler for FailureDetectorRegistry {
    fn name(&self) -> &str {
        "failure-detector"
    }

    /// Only successful completions count as arrivals.
    fn on_job_status(&self, job: &PollingJob) -> Result<(), HandlerError> {
        if job.state() != JobState::Finished {
            return Ok(());
        }
        if let Some(stopped_at) = job.stopped_at() {
            self.record_arrival(job.host(), stopped_at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::job::StatusListener;

    struct Forward(Arc<FailureDetectorRegistry>);

    impl StatusListener for Forward {
        fn on_status_change(&self, job: &PollingJob) {
            self.0.on_job_status(job).unwrap();
        }
    }

    fn host(name: &str) -> Host {
        Host::new(name, "127.0.0.1".parse().unwrap())
    }

    #[test]
    fn test_unknown_host_has_no_data() {
        let registry = FailureDetectorRegistry::new(10, Duration::from_secs(2));
        assert_eq!(registry.mean_interval_millis(&host("a")), 0);
        assert!(registry.phi(&host("a"), Instant::now()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_entries_created_on_demand() {
        let registry = FailureDetectorRegistry::new(10, Duration::from_secs(2));
        let now = Instant::now();
        registry.record_arrival(&host("a"), now);
        registry.record_arrival(&host("a"), now + Duration::from_millis(1000));
        registry.record_arrival(&host("b"), now);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.mean_interval_millis(&host("a")), 1500);
        assert_eq!(registry.mean_interval_millis(&host("b")), 2000);
    }

    #[test]
    fn test_only_finished_jobs_record_arrivals() {
        let registry = Arc::new(FailureDetectorRegistry::new(10, Duration::from_secs(2)));
        let listener = Arc::new(Forward(registry.clone()));

        let mut failed = PollingJob::new(host("a"), listener.clone());
        failed.start().unwrap();
        failed.fail("unreachable").unwrap();
        assert!(registry.model(&host("a")).is_none());

        let mut finished = PollingJob::new(host("a"), listener);
        finished.start().unwrap();
        finished.finish().unwrap();
        let model = registry.model(&host("a")).unwrap();
        assert_eq!(model.sample_count(), 1);
        assert_eq!(model.last_arrival(), finished.stopped_at());
    }

    #[test]
    fn test_snapshot_sorted_by_name() {
        let registry = FailureDetectorRegistry::new(10, Duration::from_secs(2));
        let now = Instant::now();
        registry.record_arrival(&host("zeta"), now);
        registry.record_arrival(&host("alpha"), now);

        let snapshot = registry.snapshot(now + Duration::from_millis(500));
        let names: Vec<_> = snapshot.iter().map(|(h, _)| h.name().to_string()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(snapshot[0].1.since_last_ms, Some(500));
        assert_eq!(snapshot[0].1.samples, 1);
        assert!(snapshot[0].1.phi.unwrap() > 0.0);
    }
}
