pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Evaluation API
        .route(
            "/api/v1/evaluations",
            post(handlers::handle_evaluate).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
