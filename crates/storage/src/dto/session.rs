use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{ModelId, QuerySpec, Session, SessionState};

/// Multipart body accepted by the upload endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadDocumentForm {
    pub model: Option<ModelId>,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentInfo {
    pub file_name: String,
    pub total_pages: usize,
    pub analyzed_pages: usize,
    pub text_length: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub model: ModelId,
    pub document: Option<DocumentInfo>,
    pub query: QuerySpec,
    pub status_log: Vec<String>,
    pub item_count: Option<usize>,
    pub error: Option<String>,
    pub has_report: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id,
            state: session.state,
            model: session.model,
            document: session.document.as_ref().map(|doc| DocumentInfo {
                file_name: doc.file_name.clone(),
                total_pages: doc.total_pages,
                analyzed_pages: doc.analyzed_pages,
                text_length: doc.text.len(),
                message: doc.summary(),
            }),
            query: session.query.clone(),
            status_log: session.status_log.clone(),
            item_count: session.item_count,
            error: session.error.clone(),
            has_report: session.report_html.is_some(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelListResponse {
    pub models: Vec<ModelId>,
    pub default: ModelId,
}

impl Default for ModelListResponse {
    fn default() -> Self {
        Self {
            models: ModelId::ALL.to_vec(),
            default: ModelId::default(),
        }
    }
}
