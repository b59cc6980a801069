use axum::{Router, routing::get};

use super::handlers::{health, list_models};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/models", get(list_models))
}
