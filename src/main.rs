//! phi-monitor
//!
//! Continuously probes a set of hosts and turns probe arrivals into a
//! per-host φ suspicion level.
//!
//! # Architecture Overview
//!
//! ```text
//!   hosts (CLI + config)
//!        │ resolve (fatal on failure)
//!        ▼
//!   ┌───────────┐  poll(host)  ┌──────────────┐ spawn  ┌─────────────┐
//!   │ scheduler │─────────────▶│ orchestrator │───────▶│ monitor loop│──▶ probe
//!   └───────────┘              └──────┬───────┘        └──────┬──────┘
//!                                     │ ◀── job transitions ──┘
//!                                     ▼
//!                 handlers: failure detector │ latency log │ metrics
//!                                     │
//!                                     ▼
//!                 φ reporter (logs, gauges)   admin API (/status, /hosts)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use phi_monitor::admin::{self, AdminState};
use phi_monitor::config::{load_config, MonitorConfig};
use phi_monitor::detector::{FailureDetectorRegistry, PhiReporter};
use phi_monitor::lifecycle::{resolve_hosts, signals, Shutdown};
use phi_monitor::observability::{logging, metrics};
use phi_monitor::polling::probe::probe_from_config;
use phi_monitor::polling::{MonitorSettings, PollingOrchestrator, Scheduler};

#[derive(Parser)]
#[command(name = "phi-monitor")]
#[command(about = "Adaptive host monitor with a phi-accrual failure detector", long_about = None)]
struct Cli {
    /// Host names or addresses to monitor.
    hosts: Vec<String>,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the polling interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(interval_ms) = cli.interval_ms {
        config.polling.interval_ms = interval_ms.max(1);
    }
    config.hosts.extend(cli.hosts);

    logging::init_tracing(&config.observability);
    tracing::info!("phi-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let hosts = match resolve_hosts(&config.hosts).await {
        Ok(hosts) => hosts,
        Err(e) => {
            tracing::error!(error = %e, "Some host names provided could not be resolved");
            return Ok(ExitCode::FAILURE);
        }
    };
    if hosts.is_empty() {
        tracing::warn!("No hosts configured; nothing will be polled");
    }

    tracing::info!(
        hosts = hosts.len(),
        interval_ms = config.polling.interval_ms,
        probe = ?config.probe.kind,
        window_size = config.detector.window_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(FailureDetectorRegistry::from_config(&config.detector));
    let mut builder = PollingOrchestrator::builder(probe_from_config(&config.probe), registry.clone())
        .settings(MonitorSettings::from(&config.polling));
    if config.observability.latency_log {
        builder = builder.handler(Arc::new(logging::LatencyLogHandler));
    }
    if config.observability.metrics_enabled {
        builder = builder.handler(Arc::new(metrics::MetricsHandler));
    }
    let orchestrator = builder.build();

    let shutdown = Shutdown::new();
    let mut tasks = Vec::new();

    let reporter = PhiReporter::new(registry, &config.detector);
    tasks.push(tokio::spawn(reporter.run(shutdown.subscribe())));

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState {
            orchestrator: orchestrator.clone(),
            phi_threshold: config.detector.phi_threshold,
            api_key: config.admin.api_key.as_deref().map(Arc::from),
        };
        let admin_shutdown = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API failed");
            }
        }));
    }

    let scheduler = Scheduler::new(
        orchestrator,
        hosts,
        Duration::from_millis(config.polling.interval_ms),
    );
    tasks.push(tokio::spawn(scheduler.run(shutdown.subscribe())));

    signals::wait_for_signal().await;
    shutdown.trigger();
    for task in tasks {
        let _ = task.await;
    }

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
