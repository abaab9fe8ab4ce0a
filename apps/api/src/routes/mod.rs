pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisory::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/assessment/questions",
            get(handlers::handle_get_questions),
        )
        .route(
            "/api/v1/assessment/tone-options",
            get(handlers::handle_get_tone_options),
        )
        .route("/api/v1/assessment", post(handlers::handle_assess))
        .with_state(state)
}
