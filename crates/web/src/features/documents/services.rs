use std::str::FromStr;

use axum::extract::Multipart;
use storage::models::{ModelId, Session};

use crate::error::{ApiResult, WebError};
use crate::state::AppState;

/// Fields of the upload form.
#[derive(Debug)]
pub struct Upload {
    pub model: ModelId,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    let mut model = ModelId::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("model") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| WebError::BadRequest(e.body_text()))?;
                if !value.trim().is_empty() {
                    model = ModelId::from_str(value.trim())?;
                }
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("document.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| WebError::BadRequest(e.body_text()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            other => {
                tracing::debug!("Ignoring unexpected upload field {:?}", other);
            }
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| WebError::BadRequest("No file uploaded".to_string()))?;

    Ok(Upload {
        model,
        file_name,
        bytes,
    })
}

/// Reads the uploaded PDF and stores a new session holding its text.
pub async fn create_session(state: &AppState, upload: Upload) -> ApiResult<Session> {
    tracing::info!(
        "Loading '{}' ({} bytes, model: {})",
        upload.file_name,
        upload.bytes.len(),
        upload.model
    );

    let document = state
        .loader
        .load(upload.file_name, upload.bytes)
        .await
        .map_err(WebError::DocumentRead)?;

    let mut session = Session::new(upload.model);
    session.load(document)?;
    state.sessions.insert(session.clone()).await;

    tracing::info!(
        "Created session {}: {}",
        session.session_id,
        session
            .document
            .as_ref()
            .map(|d| d.summary())
            .unwrap_or_default()
    );
    Ok(session)
}
