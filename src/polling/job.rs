//! A single probe attempt against one host.
//!
//! # State Transitions
//! ```text
//! start():  NotStarted → Started   (records start instant)
//! finish(): Started → Finished     (records stop instant)
//! fail():   Started → Error        (records stop instant and reason)
//! ```
//!
//! # Design Decisions
//! - Every accepted transition notifies the listener before returning
//! - Transitions out of a terminal state are rejected and leave the job
//!   untouched
//! - Timestamps are monotonic (`Instant`)

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::polling::types::{Host, JobState};

/// Receives every lifecycle transition of a job, synchronously.
pub trait StatusListener: Send + Sync {
    fn on_status_change(&self, job: &PollingJob);
}

/// Errors raised by job lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("invalid transition for {host}: {from} -> {to}")]
    InvalidTransition {
        host: String,
        from: JobState,
        to: JobState,
    },
}

pub struct PollingJob {
    host: Host,
    state: JobState,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
    error: Option<String>,
    listener: Arc<dyn StatusListener>,
}

impl PollingJob {
    pub fn new(host: Host, listener: Arc<dyn StatusListener>) -> Self {
        Self {
            host,
            state: JobState::NotStarted,
            started_at: None,
            stopped_at: None,
            error: None,
            listener,
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn stopped_at(&self) -> Option<Instant> {
        self.stopped_at
    }

    /// Failure reason, present only in the Error state.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// `stop - start`, defined only once the job has stopped.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(stop)) => Some(stop.saturating_duration_since(start)),
            _ => None,
        }
    }

    pub fn start(&mut self) -> Result<(), JobError> {
        self.transition(JobState::Started, Instant::now(), None)
    }

    pub fn finish(&mut self) -> Result<(), JobError> {
        self.finish_at(Instant::now())
    }

    /// Finish with a stop instant captured where the probe returned.
    pub fn finish_at(&mut self, stopped_at: Instant) -> Result<(), JobError> {
        self.transition(JobState::Finished, stopped_at, None)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), JobError> {
        self.fail_at(Instant::now(), reason)
    }

    pub fn fail_at(&mut self, stopped_at: Instant, reason: impl Into<String>) -> Result<(), JobError> {
        self.transition(JobState::Error, stopped_at, Some(reason.into()))
    }

    fn transition(
        &mut self,
        next: JobState,
        at: Instant,
        error: Option<String>,
    ) -> Result<(), JobError> {
        if !self.state.can_transition_to(next) {
            tracing::error!(
                host = %self.host,
                from = %self.state,
                to = %next,
                "Rejected polling job transition"
            );
            return Err(JobError::InvalidTransition {
                host: self.host.name().to_string(),
                from: self.state,
                to: next,
            });
        }

        match next {
            JobState::Started => self.started_at = Some(at),
            JobState::Finished | JobState::Error => self.stopped_at = Some(at),
            JobState::NotStarted => {}
        }
        if error.is_some() {
            self.error = error;
        }
        self.state = next;

        tracing::trace!(job = %self, "Polling job transitioned");
        let listener = self.listener.clone();
        listener.on_status_change(self);
        Ok(())
    }
}

impl fmt::Debug for PollingJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingJob")
            .field("host", &self.host)
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("stopped_at", &self.stopped_at)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PollingJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target: {}, status: {}", self.host, self.state)?;
        if let Some(duration) = self.duration() {
            write!(f, ", duration: {:?}", duration)?;
        }
        if let Some(error) = &self.error {
            write!(f, ", error: {}", error)?;
        }
        Ok(())
    }
}
