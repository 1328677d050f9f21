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
        // Profile Form page
        .route("/", get(handlers::handle_form_page))
        .route("/advisory", post(handlers::handle_form_submit))
        // Advisory API
        .route("/api/v1/advisory", post(handlers::handle_api_advisory))
        .with_state(state)
}
