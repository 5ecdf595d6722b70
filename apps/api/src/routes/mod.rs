pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::results::handlers as results;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Submission
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/validate", post(analysis::handle_analyze))
        // Read side
        .route("/api/results", get(results::handle_list_results))
        .route("/api/results/:id", get(results::handle_get_result))
        .route("/api/wall-of-shame", get(results::handle_wall_of_shame))
        .route("/api/admin/analytics", get(results::handle_analytics))
        .with_state(state)
}
