use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, http::Method};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{audit, documents, system};
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let api_sessions = documents::routes::api_routes().merge(audit::routes::api_routes());

    Router::new()
        .merge(documents::routes::page_routes())
        .merge(audit::routes::page_routes())
        .merge(system::routes::routes())
        .nest("/api/sessions", api_sessions)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
