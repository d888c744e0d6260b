pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::portfolio::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public read surface
        .route(
            "/api/v1/portfolio/:username",
            get(handlers::handle_public_portfolio),
        )
        // Authenticated write surface
        .route("/api/v1/portfolio", get(handlers::handle_get_own))
        .route(
            "/api/v1/portfolio/sections/:kind",
            put(handlers::handle_save_section),
        )
        .route(
            "/api/v1/portfolio/import/json",
            post(handlers::handle_import_json),
        )
        .route(
            "/api/v1/portfolio/import/resume",
            post(handlers::handle_import_resume),
        )
        .with_state(state)
}
