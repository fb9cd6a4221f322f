//! Admin API.
//!
//! `GET /status` summarises the monitor, `GET /hosts` lists per-host
//! statistics. Optional bearer-token authentication.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::polling::orchestrator::PollingOrchestrator;
use self::auth::admin_auth_middleware;
use self::handlers::{get_hosts, get_status};

#[derive(Clone)]
pub struct AdminState {
    pub orchestrator: Arc<PollingOrchestrator>,
    pub phi_threshold: f64,
    pub api_key: Option<Arc<str>>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/hosts", get(get_hosts))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin API until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin API starting");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}
