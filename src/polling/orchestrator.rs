//! Polling orchestrator.
//!
//! # Responsibilities
//! - Keep at most one monitor loop in flight per host
//! - Fan every job transition out to the registered handlers
//! - Release a host once its job reaches a terminal state
//!
//! # Design Decisions
//! - The active set is a `DashMap`; `entry()` makes check-and-insert atomic
//! - Handlers run synchronously, in registration order, before the host is
//!   released, so per-host transitions reach handlers strictly in sequence
//! - A failing or panicking handler is logged and skipped

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::detector::registry::FailureDetectorRegistry;
use crate::observability::metrics;
use crate::polling::handler::StatusHandler;
use crate::polling::job::{PollingJob, StatusListener};
use crate::polling::monitor::{MonitorLoop, MonitorSettings};
use crate::polling::probe::Probe;
use crate::polling::types::Host;

pub struct PollingOrchestrator {
    probe: Arc<dyn Probe>,
    registry: Arc<FailureDetectorRegistry>,
    handlers: Vec<Arc<dyn StatusHandler>>,
    settings: MonitorSettings,
    /// Hosts with a monitor in flight, with the instant it was started.
    active: DashMap<Host, Instant>,
    this: Weak<PollingOrchestrator>,
}

impl PollingOrchestrator {
    pub fn builder(
        probe: Arc<dyn Probe>,
        registry: Arc<FailureDetectorRegistry>,
    ) -> PollingOrchestratorBuilder {
        PollingOrchestratorBuilder {
            probe,
            registry,
            handlers: Vec::new(),
            settings: MonitorSettings::default(),
        }
    }

    /// Start a monitor for `host` unless one is already in flight.
    ///
    /// Never blocks. Returns whether a new monitor was started.
    pub fn poll(&self, host: &Host) -> bool {
        tracing::debug!(host = %host, "Polling");

        let Some(this) = self.this.upgrade() else {
            return false;
        };
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(host = %host, error = %e, "No runtime to run monitor on");
                return false;
            }
        };

        match self.active.entry(host.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(host = %host, "Previous poll still in flight, skipped");
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
            }
        }
        metrics::record_active_monitors(self.active.len());

        let monitor = MonitorLoop::new(
            host.clone(),
            self.probe.clone(),
            self.registry.clone(),
            this,
            self.settings,
        );
        runtime.spawn(monitor.run());
        true
    }

    pub fn is_active(&self, host: &Host) -> bool {
        self.active.contains_key(host)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Hosts with a monitor in flight and the instant each was started.
    pub fn active_hosts(&self) -> Vec<(Host, Instant)> {
        self.active
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn registry(&self) -> &Arc<FailureDetectorRegistry> {
        &self.registry
    }

    fn dispatch(&self, job: &PollingJob) {
        for handler in &self.handlers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.on_job_status(job)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(
                        handler = handler.name(),
                        host = %job.host(),
                        error = %e,
                        "Status handler failed"
                    );
                    metrics::record_handler_failure(handler.name());
                }
                Err(_) => {
                    tracing::error!(
                        handler = handler.name(),
                        host = %job.host(),
                        "Status handler panicked"
                    );
                    metrics::record_handler_failure(handler.name());
                }
            }
        }
    }
}

impl StatusListener for PollingOrchestrator {
    fn on_status_change(&self, job: &PollingJob) {
        tracing::debug!(job = %job, "Updating status");

        self.dispatch(job);

        if job.is_stopped() {
            self.active.remove(job.host());
            metrics::record_active_monitors(self.active.len());
        }
    }
}

pub struct PollingOrchestratorBuilder {
    probe: Arc<dyn Probe>,
    registry: Arc<FailureDetectorRegistry>,
    handlers: Vec<Arc<dyn StatusHandler>>,
    settings: MonitorSettings,
}

impl PollingOrchestratorBuilder {
    /// Append a handler. The registry itself always runs first.
    pub fn handler(mut self, handler: Arc<dyn StatusHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn settings(mut self, settings: MonitorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Arc<PollingOrchestrator> {
        let mut handlers: Vec<Arc<dyn StatusHandler>> = Vec::with_capacity(self.handlers.len() + 1);
        handlers.push(self.registry.clone());
        handlers.extend(self.handlers);

        Arc::new_cyclic(|this| PollingOrchestrator {
            probe: self.probe,
            registry: self.registry,
            handlers,
            settings: self.settings,
            active: DashMap::new(),
            this: this.clone(),
        })
    }
}
