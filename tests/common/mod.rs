//! Shared helpers for orchestrator and admin API tests.

#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use phi_monitor::polling::{
    HandlerError, Host, JobState, MonitorSettings, PollingJob, Probe, ProbeError, StatusHandler,
};

pub fn host(name: &str) -> Host {
    Host::new(name, "127.0.0.1".parse().unwrap())
}

pub fn fast_settings() -> MonitorSettings {
    MonitorSettings {
        min_check_interval: Duration::from_millis(5),
        probe_timeout: Duration::from_secs(1),
    }
}

/// Poll `condition` every few milliseconds until it holds or `timeout`
/// elapses.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

pub async fn with_timeout<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("test timed out")
}

/// Probe that blocks until released, counting calls.
#[derive(Clone, Default)]
pub struct GatedProbe {
    pub released: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
}

impl GatedProbe {
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for GatedProbe {
    fn probe(&self, _host: &Host, timeout: Duration) -> Result<(), ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let deadline = std::time::Instant::now() + timeout;
        while !self.released.load(Ordering::SeqCst) {
            if std::time::Instant::now() >= deadline {
                return Err(ProbeError::Timeout(timeout));
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub handler: &'static str,
    pub host: String,
    pub state: JobState,
    pub error: Option<String>,
    pub has_duration: bool,
}

/// Records every transition it sees into a shared log.
pub struct RecordingHandler {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<Event>>>,
}

impl RecordingHandler {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<Event>>>) -> Self {
        Self { label, log }
    }
}

impl StatusHandler for RecordingHandler {
    fn name(&self) -> &str {
        self.label
    }

    fn on_job_status(&self, job: &PollingJob) -> Result<(), HandlerError> {
        self.log.lock().push(Event {
            handler: self.label,
            host: job.host().name().to_string(),
            state: job.state(),
            error: job.error().map(str::to_string),
            has_duration: job.duration().is_some(),
        });
        Ok(())
    }
}

pub struct FailingHandler;

impl StatusHandler for FailingHandler {
    fn name(&self) -> &str {
        "failing"
    }

    fn on_job_status(&self, _job: &PollingJob) -> Result<(), HandlerError> {
        Err(HandlerError::Failed("sink unavailable".into()))
    }
}

pub struct PanickingHandler;

impl StatusHandler for PanickingHandler {
    fn name(&self) -> &str {
        "panicking"
    }

    fn on_job_status(&self, _job: &PollingJob) -> Result<(), HandlerError> {
        panic!("handler bug");
    }
}
