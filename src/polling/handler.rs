//! Status handler interface.
//!
//! Handlers receive every lifecycle transition of every job, in the order
//! they were registered with the orchestrator. A handler must not block for
//! long; failures are isolated by the orchestrator and never reach the job
//! or the remaining handlers.

use thiserror::Error;

use crate::polling::job::PollingJob;

/// Errors a status handler may report.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),
}

pub trait StatusHandler: Send + Sync {
    /// Name used in logs and metric labels.
    fn name(&self) -> &str;

    fn on_job_status(&self, job: &PollingJob) -> Result<(), HandlerError>;
}
