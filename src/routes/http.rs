// GET handlers and the fault control endpoint

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;
use crate::models::{FaultAck, SetFaultRequest};
use crate::version::{NAME, VERSION};

/// GET /health — liveness probe.
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /metrics — current raw samples for all services (unclassified;
/// the classified view is what /ws/snapshot streams).
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.repo.all_metrics() {
        Ok(metrics) => Json(metrics).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "all_metrics", "metrics read failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /services/{service_name}/fault — set the fault mode for one
/// service. The snapshot stream reflects the effect only once the
/// simulator produces it; this endpoint acknowledges the request, nothing
/// more.
pub(super) async fn set_fault_handler(
    State(state): State<AppState>,
    Path(service_name): Path<String>,
    Json(request): Json<SetFaultRequest>,
) -> impl IntoResponse {
    match state.repo.set_fault(&service_name, request.mode) {
        Ok(true) => {
            tracing::info!(service_name = %service_name, mode = %request.mode, "fault mode set");
            (
                StatusCode::OK,
                Json(FaultAck {
                    service_name,
                    mode: request.mode,
                }),
            )
                .into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown service: {service_name}") })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "set_fault", "fault state update failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
