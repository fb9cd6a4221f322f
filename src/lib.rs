//! Adaptive host monitor with a φ-accrual failure detector.

pub mod admin;
pub mod config;
pub mod detector;
pub mod lifecycle;
pub mod observability;
pub mod polling;

pub use config::MonitorConfig;
pub use detector::FailureDetectorRegistry;
pub use lifecycle::Shutdown;
pub use polling::PollingOrchestrator;
