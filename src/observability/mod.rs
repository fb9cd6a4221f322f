//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, latency records)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Latency records and φ reports go to their own log targets
//!   (`latency`, `phi`) so they can be filtered or routed separately
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
