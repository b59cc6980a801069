use utoipa::OpenApi;

use crate::features::{audit, documents, system};

#[derive(OpenApi)]
#[openapi(
    paths(
        documents::handlers::create_session,
        documents::handlers::get_session,
        audit::handlers::run_audit,
        system::handlers::health,
        system::handlers::list_models,
    ),
    components(
        schemas(
            storage::dto::session::UploadDocumentForm,
            storage::dto::session::DocumentInfo,
            storage::dto::session::SessionResponse,
            storage::dto::session::ModelListResponse,
            storage::dto::audit::AuditRequest,
            storage::dto::audit::AuditResponse,
            storage::models::ModelId,
            storage::models::QuerySpec,
            storage::models::SessionState,
            system::handlers::HealthResponse,
        )
    ),
    tags(
        (name = "sessions", description = "Document upload and session state"),
        (name = "audit", description = "Source-grounded extraction runs"),
        (name = "system", description = "Health and model listing"),
    )
)]
pub struct ApiDoc;
