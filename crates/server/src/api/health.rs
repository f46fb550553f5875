use axum::Json;
use axum::extract::State;

use super::AppState;
use super::schemas::HealthResponse;

/// `GET /health` -- service status together with a metrics snapshot.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        metrics: state.service.metrics().snapshot().into(),
    })
}
