use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use codequest_api_types::{ChallengeResponse, CreateChallengeRequest};

use super::error::ApiError;
use super::state::AppState;
use super::users::resolve_viewer;
use crate::repository::NewChallenge;

/// Challenges are authored by staff; students only submit to them.
pub async fn create_challenge(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateChallengeRequest>,
) -> Result<(StatusCode, Json<ChallengeResponse>), ApiError> {
    let viewer = resolve_viewer(&state, &headers).await?;

    if !viewer.role.reviews_all_submissions() {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "only instructors may create challenges",
        ));
    }

    if request.title.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_FAILED",
            "challenge title must not be empty",
        ));
    }

    let challenge = state
        .challenges
        .create(NewChallenge {
            title: request.title,
            description: request.description,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ChallengeResponse {
            id: challenge.id.to_string(),
            title: challenge.title,
            description: challenge.description,
        }),
    ))
}
