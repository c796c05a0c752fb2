pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/matches", post(handlers::handle_find_matches))
        .route(
            "/api/v1/matches/text",
            post(handlers::handle_find_matches_text),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
