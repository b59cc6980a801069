use axum::{Router, routing::post};

use super::handlers::{audit_page, run_audit};
use crate::state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/sessions/:id/audit", post(audit_page))
}

pub fn api_routes() -> Router<AppState> {
    Router::new().route("/:id/audit", post(run_audit))
}
