//! φ-accrual failure detection.
//!
//! # Data Flow
//! ```text
//! Job finished (polling handler fan-out)
//!     → registry.rs: model for host (created on first arrival)
//!     → accrual.rs: record inter-arrival interval
//!     → window.rs: bounded FIFO, running sum
//!
//! Readers:
//!     → monitor loops: mean interval sizes the next check
//!     → reporter.rs: periodic φ per host
//!     → admin API: point-in-time statistics
//! ```
//!
//! # Design Decisions
//! - Mean of recent intervals instead of a fitted distribution: O(1)
//!   updates and no numerical instability
//! - Failed probes are not arrivals; their silence is what φ measures
//! - Models are never evicted; the window bounds memory per host

pub mod accrual;
pub mod registry;
pub mod reporter;
pub mod window;

pub use accrual::{ArrivalAccrualModel, PHI_FACTOR};
pub use registry::{FailureDetectorRegistry, HostStatistics};
pub use reporter::PhiReporter;
pub use window::BoundedStatsWindow;
