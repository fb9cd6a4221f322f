//! Polling subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (fixed cadence)
//!     → orchestrator.rs poll(host): skip if a monitor is in flight
//!     → monitor.rs MonitorLoop per host
//!         → job.rs PollingJob lifecycle, probe.rs on the blocking pool
//!     → every transition: orchestrator fans out to handler.rs handlers
//!         (failure detector registry first, then sinks)
//!     → terminal transition releases the host
//! ```
//!
//! # Design Decisions
//! - One tokio task per in-flight host; never more than one per host
//! - Probes are pluggable values, not a type hierarchy
//! - Notification is a direct synchronous call, not a queue

pub mod handler;
pub mod job;
pub mod monitor;
pub mod orchestrator;
pub mod probe;
pub mod scheduler;
pub mod types;

pub use handler::{HandlerError, StatusHandler};
pub use job::{JobError, PollingJob, StatusListener};
pub use monitor::{MonitorLoop, MonitorSettings};
pub use orchestrator::PollingOrchestrator;
pub use probe::{Probe, ProbeError};
pub use scheduler::Scheduler;
pub use types::{Host, JobState};
