//! Host identity and job lifecycle states.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

/// A monitored host: the name it was configured under plus the address it
/// resolved to at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Host {
    name: String,
    addr: IpAddr,
}

impl Host {
    pub fn new(name: impl Into<String>, addr: IpAddr) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Lifecycle state of a polling job.
///
/// ```text
/// NotStarted → Started → Finished
///                      → Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    NotStarted,
    Started,
    Finished,
    Error,
}

impl JobState {
    /// Finished and Error admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Finished | JobState::Error)
    }

    /// Whether `self → next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::NotStarted, JobState::Started)
                | (JobState::Started, JobState::Finished)
                | (JobState::Started, JobState::Error)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::NotStarted => "NOT_STARTED",
            JobState::Started => "STARTED",
            JobState::Finished => "FINISHED",
            JobState::Error => "ERROR",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
