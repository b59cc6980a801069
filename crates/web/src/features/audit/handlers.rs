use axum::{
    Form, Json,
    extract::{Path, State},
    response::Html,
};
use storage::dto::audit::{AuditRequest, AuditResponse};
use uuid::Uuid;

use crate::error::{ApiResult, HtmlError, PageResult};
use crate::state::AppState;
use crate::views;

use super::services;

/// Runs the audit from the session page form and renders the result.
///
/// A failed run still renders the session page, which shows the error.
pub async fn audit_page(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Form(payload): Form<AuditRequest>,
) -> PageResult<Html<String>> {
    if let Err(error) = services::run_audit(&state, session_id, payload.into()).await {
        if !error.is_run_failure() {
            return Err(HtmlError(error));
        }
    }

    let session = state.sessions.find_by_id(session_id).await?;
    Ok(Html(views::session_page(&session)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/audit",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Audit completed", body = AuditResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no document or is already running"),
        (status = 412, description = "No Gemini API key configured"),
        (status = 502, description = "Extraction or visualization failed")
    ),
    tag = "audit"
)]
pub async fn run_audit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AuditRequest>,
) -> ApiResult<Json<AuditResponse>> {
    let outcome = services::run_audit(&state, session_id, payload.into()).await?;

    Ok(Json(AuditResponse {
        session_id,
        item_count: outcome.item_count,
        message: outcome.message,
        report_html: outcome.report_html,
    }))
}
