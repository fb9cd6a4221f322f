//! Admin API tests against a live listener.

use std::sync::Arc;
use std::time::{Duration, Instant};

use phi_monitor::admin::{self, AdminState};
use phi_monitor::detector::FailureDetectorRegistry;
use phi_monitor::lifecycle::Shutdown;
use phi_monitor::polling::{MonitorSettings, PollingOrchestrator};
use serde_json::Value;
use tokio::net::TcpListener;

mod common;

use common::{fast_settings, host, with_timeout, GatedProbe};

async fn start_admin(
    api_key: Option<&str>,
) -> (String, Arc<PollingOrchestrator>, GatedProbe, Shutdown, tokio::task::JoinHandle<()>) {
    let registry = Arc::new(FailureDetectorRegistry::new(10, Duration::from_millis(1000)));
    let probe = GatedProbe::default();
    let orchestrator = PollingOrchestrator::builder(Arc::new(probe.clone()), registry)
        .settings(MonitorSettings {
            probe_timeout: Duration::from_secs(30),
            ..fast_settings()
        })
        .build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AdminState {
        orchestrator: orchestrator.clone(),
        phi_threshold: 2.0,
        api_key: api_key.map(Arc::from),
    };
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let task = tokio::spawn(async move {
        admin::serve(listener, state, rx).await.unwrap();
    });

    (format!("http://{}", addr), orchestrator, probe, shutdown, task)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_status_and_hosts() {
    let (url, orchestrator, probe, shutdown, task) = start_admin(None).await;
    let registry = orchestrator.registry().clone();

    // one quiet host well past its mean, one probe in flight
    let t0 = Instant::now() - Duration::from_secs(5);
    registry.record_arrival(&host("quiet"), t0);
    assert!(orchestrator.poll(&host("pending")));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let status: Value = client
        .get(format!("{}/status", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["tracked_hosts"], 1);
    assert_eq!(status["active_monitors"], 1);

    let hosts: Value = client
        .get(format!("{}/hosts", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let hosts = hosts.as_array().unwrap();
    assert_eq!(hosts.len(), 2);

    assert_eq!(hosts[0]["host"], "pending");
    assert_eq!(hosts[0]["in_flight"], true);
    assert!(hosts[0]["in_flight_ms"].as_u64().is_some());
    assert_eq!(hosts[0]["samples"], 0);
    assert!(hosts[0]["phi"].is_null());

    assert_eq!(hosts[1]["host"], "quiet");
    assert_eq!(hosts[1]["samples"], 1);
    assert_eq!(hosts[1]["mean_interval_ms"], 1000);
    assert_eq!(hosts[1]["suspect"], true);
    assert_eq!(hosts[1]["in_flight"], false);
    assert!(hosts[1]["in_flight_ms"].is_null());
    assert!(hosts[1]["phi"].as_f64().unwrap() > 2.0);

    drop(client);
    probe.release();
    shutdown.trigger();
    with_timeout(task).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_api_key_required_when_configured() {
    let (url, _orchestrator, _probe, shutdown, task) = start_admin(Some("secret")).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("{}/status", url)).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("{}/status", url))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("{}/status", url))
        .bearer_auth("secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    drop(client);
    shutdown.trigger();
    with_timeout(task).await.unwrap();
}
