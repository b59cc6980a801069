use axum::{Json, extract::State};
use serde::Serialize;
use storage::dto::session::ModelListResponse;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

#[utoipa::path(
    get,
    path = "/api/models",
    responses(
        (status = 200, description = "Models that can be selected for an audit", body = ModelListResponse)
    ),
    tag = "system"
)]
pub async fn list_models() -> Json<ModelListResponse> {
    Json(ModelListResponse::default())
}
