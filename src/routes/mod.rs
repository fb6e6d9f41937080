// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics_repo::MetricsRepo;
use crate::models::SystemSnapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot_tx: broadcast::Sender<SystemSnapshot>,
    pub(crate) repo: Arc<MetricsRepo>,
    pub(crate) ws_snapshot_connections: Arc<AtomicUsize>,
}

pub fn app(
    snapshot_tx: broadcast::Sender<SystemSnapshot>,
    repo: Arc<MetricsRepo>,
    ws_snapshot_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        snapshot_tx,
        repo,
        ws_snapshot_connections,
    };
    Router::new()
        .route("/health", get(http::health_handler)) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route(
            "/services/{service_name}/fault",
            post(http::set_fault_handler),
        ) // POST /services/{name}/fault
        .route("/ws/snapshot", get(ws::ws_snapshot)) // WS /ws/snapshot
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
