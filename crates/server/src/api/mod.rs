//! HTTP surface of the service.
//!
//! Handlers resolve the viewer, call the access policy, and translate
//! policy results into JSON responses.

pub mod challenges;
pub mod error;
pub mod state;
pub mod submissions;
pub mod users;

use std::sync::Arc;

use axum::{Json, Router, routing::get, routing::post};
use codequest_api_types::HealthCheckResponse;

pub use state::AppState;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(users::register_user))
        .route("/api/challenges", post(challenges::create_challenge))
        .route(
            "/api/challenges/{challenge_id}/submissions",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route("/api/submissions/{id}", get(submissions::fetch_submission))
        .route(
            "/api/submissions/{id}/comments",
            post(submissions::create_comment),
        )
}

async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
