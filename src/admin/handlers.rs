use std::collections::{HashMap, HashSet};
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::detector::registry::HostStatistics;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub tracked_hosts: usize,
    pub active_monitors: usize,
}

#[derive(Debug, Serialize)]
pub struct HostStatus {
    #[serde(flatten)]
    pub stats: HostStatistics,
    pub suspect: bool,
    pub in_flight: bool,
    /// How long the current probe has been running, if one is.
    pub in_flight_ms: Option<u64>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        tracked_hosts: state.orchestrator.registry().len(),
        active_monitors: state.orchestrator.active_count(),
    })
}

pub async fn get_hosts(State(state): State<AdminState>) -> Json<Vec<HostStatus>> {
    let now = Instant::now();
    let in_flight: HashMap<_, _> = state
        .orchestrator
        .active_hosts()
        .into_iter()
        .map(|(host, started)| (host, now.saturating_duration_since(started).as_millis() as u64))
        .collect();

    let snapshot = state.orchestrator.registry().snapshot(now);
    let mut statuses: Vec<HostStatus> = Vec::with_capacity(snapshot.len());
    let mut seen = HashSet::new();

    for (host, stats) in snapshot {
        statuses.push(HostStatus {
            suspect: stats.phi.is_some_and(|phi| phi >= state.phi_threshold),
            in_flight: in_flight.contains_key(&host),
            in_flight_ms: in_flight.get(&host).copied(),
            stats,
        });
        seen.insert(host);
    }

    // hosts polled at least once but never answered
    for (host, elapsed_ms) in in_flight.iter().filter(|(host, _)| !seen.contains(*host)) {
        statuses.push(HostStatus {
            stats: HostStatistics {
                host: host.name().to_string(),
                address: host.addr().to_string(),
                samples: 0,
                mean_interval_ms: 0,
                since_last_ms: None,
                phi: None,
            },
            suspect: false,
            in_flight: true,
            in_flight_ms: Some(*elapsed_ms),
        });
    }

    statuses.sort_by(|a, b| a.stats.host.cmp(&b.stats.host));
    Json(statuses)
}
