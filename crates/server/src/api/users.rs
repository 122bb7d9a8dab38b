use std::str::FromStr;
use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use codequest_api_types::{RegisterUserRequest, UserResponse};
use codequest_core::domain::{Role, UserId};
use sea_orm::{DbErr, SqlErr};

use super::error::ApiError;
use super::state::AppState;
use crate::access::Viewer;
use crate::repository::{NewUser, UserRecord};

/// Header carrying the authenticated user id. Session handling lives in
/// the upstream identity provider; this service only sees the resolved id.
pub const VIEWER_HEADER: &str = "x-user-id";

/// Resolve the viewer for a request, or reject it with 401 before any
/// policy code runs.
pub async fn resolve_viewer(state: &AppState, headers: &HeaderMap) -> Result<Viewer, ApiError> {
    let raw = headers
        .get(VIEWER_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("you need to sign in before continuing"))?;

    let user_id = UserId::from_str(raw)
        .map_err(|_| ApiError::unauthorized("you need to sign in before continuing"))?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("you need to sign in before continuing"))?;

    Ok(Viewer {
        id: user.id,
        role: user.role,
    })
}

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if request.username.trim().is_empty() || request.email.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_FAILED",
            "username and email must not be empty",
        ));
    }

    if state
        .users
        .find_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "USERNAME_TAKEN",
            "username is already taken",
        ));
    }

    let user = state
        .users
        .create(NewUser {
            username: request.username,
            email: request.email,
            role: Role::Student,
        })
        .await
        .map_err(map_registration_error)?;

    Ok((StatusCode::CREATED, Json(to_response(user))))
}

// The username pre-check races with concurrent registrations; the
// unique constraints on username and email are the authority.
fn map_registration_error(err: anyhow::Error) -> ApiError {
    let unique_violation = err
        .downcast_ref::<DbErr>()
        .and_then(DbErr::sql_err)
        .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)));

    if unique_violation {
        ApiError::new(
            StatusCode::CONFLICT,
            "ALREADY_TAKEN",
            "username or email is already taken",
        )
    } else {
        err.into()
    }
}

fn to_response(user: UserRecord) -> UserResponse {
    let role = match user.role {
        Role::Student => "student",
        Role::Instructor => "instructor",
        Role::Admin => "admin",
    };

    UserResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
        role: role.to_string(),
    }
}
