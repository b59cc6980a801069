use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::QuerySpec;

/// Topic and fields for an audit run. Both are passed to the model verbatim.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuditRequest {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_fields")]
    pub fields: String,
}

fn default_topic() -> String {
    QuerySpec::DEFAULT_TOPIC.to_string()
}

fn default_fields() -> String {
    QuerySpec::DEFAULT_FIELDS.to_string()
}

impl From<AuditRequest> for QuerySpec {
    fn from(request: AuditRequest) -> Self {
        QuerySpec::new(request.topic, request.fields)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditResponse {
    pub session_id: Uuid,
    pub item_count: usize,
    pub message: String,
    pub report_html: String,
}
