use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{create_session, get_session, index_page, session_page, upload_page};
use crate::state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/sessions", post(upload_page))
        .route("/sessions/:id", get(session_page))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
}
