pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/match/job-posting", post(handlers::handle_job_posting))
        .route(
            "/match/candidate-profile",
            post(handlers::handle_candidate_profile),
        )
        .with_state(state)
}
