//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Host names to monitor (merged with hosts given on the command line).
    pub hosts: Vec<String>,

    /// Outer polling cadence and probe timing.
    pub polling: PollingConfig,

    /// Probe selection.
    pub probe: ProbeConfig,

    /// Failure detector tuning.
    pub detector: DetectorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Polling cadence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval between polls of every host, in milliseconds.
    pub interval_ms: u64,

    /// Timeout handed to each probe, in milliseconds.
    pub probe_timeout_ms: u64,

    /// Floor for a monitor loop's completion check interval, in milliseconds.
    pub min_check_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            probe_timeout_ms: 10_000,
            min_check_interval_ms: 100,
        }
    }
}

/// Which probe implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Tcp,
    Command,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub kind: ProbeKind,

    /// Port used by the TCP probe (7 = echo).
    pub tcp_port: u16,

    /// Program used by the command probe.
    pub command: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Tcp,
            tcp_port: 7,
            command: "ping".to_string(),
        }
    }
}

/// Failure detector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of inter-arrival samples kept per host.
    pub window_size: usize,

    /// Interval the window is seeded with on a host's first arrival, in
    /// milliseconds. Twice the default polling interval.
    pub max_interval_ms: u64,

    /// φ at or above which a host is reported as suspect.
    pub phi_threshold: f64,

    /// Interval between φ reports, in milliseconds.
    pub report_interval_ms: u64,

    /// Delay before the first φ report, in milliseconds.
    pub report_delay_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 1000,
            max_interval_ms: 2000,
            phi_threshold: 8.0,
            report_interval_ms: 1000,
            report_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Log one latency record per completed probe.
    pub latency_log: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            latency_log: true,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// Admin API bind address.
    pub bind_address: String,

    /// Bearer token required by the admin API; unauthenticated when unset.
    pub api_key: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1:8081".to_string(),
            api_key: None,
        }
    }
}
