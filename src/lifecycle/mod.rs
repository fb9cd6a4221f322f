//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Resolve hosts → Start drivers
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop scheduler, reporter, admin API → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: an unresolvable host is fatal
//! - In-flight probes are not cancelled; process exit ends them

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{resolve_hosts, StartupError};
