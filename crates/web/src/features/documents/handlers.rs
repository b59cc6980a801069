use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use storage::dto::session::{SessionResponse, UploadDocumentForm};
use uuid::Uuid;

use crate::error::{ApiResult, PageResult, WebError};
use crate::state::AppState;
use crate::views;

use super::services;

pub async fn index_page() -> Html<String> {
    Html(views::index_page())
}

pub async fn upload_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> PageResult<Redirect> {
    let upload = services::read_upload(multipart).await?;
    let session = services::create_session(&state, upload).await?;

    Ok(Redirect::to(&format!("/sessions/{}", session.session_id)))
}

pub async fn session_page(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> PageResult<Html<String>> {
    let session = state.sessions.find_by_id(session_id).await?;

    Ok(Html(views::session_page(&session)))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document loaded into a new session", body = SessionResponse),
        (status = 400, description = "Missing file or unknown model"),
        (status = 422, description = "The file could not be read as a PDF")
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let upload = services::read_upload(multipart).await?;
    let session = services::create_session(&state, upload).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Current session state", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state.sessions.find_by_id(session_id).await?;

    Ok(Json(SessionResponse::from(&session)))
}
