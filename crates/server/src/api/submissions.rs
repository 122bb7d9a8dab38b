use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    http::StatusCode,
};
use codequest_api_types::{
    CommentResponse, CreateCommentRequest, CreateSubmissionRequest, SourceFilePayload,
    SubmissionDetailResponse, SubmissionListResponse, SubmissionSummary,
};
use codequest_core::domain::{ChallengeId, SubmissionId};
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use super::users::resolve_viewer;
use crate::access::{SourceFileDraft, SubmissionDraft, SubmissionWithAuthor};

pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(challenge_id): Path<String>,
) -> Result<Json<SubmissionListResponse>, ApiError> {
    let viewer = resolve_viewer(&state, &headers).await?;
    let challenge_id = parse_challenge_id(&challenge_id)?;

    let visible = state.policy.visible_submissions(viewer, challenge_id).await?;

    Ok(Json(SubmissionListResponse {
        submissions: visible.submissions.into_iter().map(to_summary).collect(),
        peers_hidden: visible.peers_hidden,
    }))
}

pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(challenge_id): Path<String>,
    Json(request): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionSummary>), ApiError> {
    let viewer = resolve_viewer(&state, &headers).await?;
    let challenge_id = parse_challenge_id(&challenge_id)?;

    let draft = SubmissionDraft {
        body: request.body,
        public: request.public,
        source_files: request
            .source_files
            .into_iter()
            .map(|f| SourceFileDraft {
                filename: f.filename,
                body: f.body,
            })
            .collect(),
    };

    let submission = state
        .policy
        .create_submission(viewer, challenge_id, draft)
        .await?;

    info!(
        submission_id = %submission.id,
        user_id = %viewer.id,
        challenge_id = %challenge_id,
        "solution submitted"
    );

    let username = state
        .users
        .find_by_id(viewer.id)
        .await?
        .map(|u| u.username)
        .ok_or_else(|| anyhow::anyhow!("viewer {} missing from database", viewer.id))?;

    Ok((
        StatusCode::CREATED,
        Json(to_summary(SubmissionWithAuthor {
            submission,
            username,
        })),
    ))
}

pub async fn fetch_submission(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SubmissionDetailResponse>, ApiError> {
    let viewer = resolve_viewer(&state, &headers).await?;
    let submission_id = parse_submission_id(&id)?;

    let detail = state.policy.fetch_submission(viewer, submission_id).await?;

    Ok(Json(SubmissionDetailResponse {
        id: detail.submission.id.to_string(),
        challenge_id: detail.submission.challenge_id.to_string(),
        user_id: detail.submission.user_id.to_string(),
        username: detail.username,
        body: detail.submission.body,
        public: detail.submission.public,
        source_files: detail
            .source_files
            .into_iter()
            .map(|f| SourceFilePayload {
                filename: f.filename,
                body: f.body,
            })
            .collect(),
        comments: detail
            .comments
            .into_iter()
            .map(|c| CommentResponse {
                id: c.id.to_string(),
                user_id: c.user_id.to_string(),
                body: c.body,
            })
            .collect(),
    }))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let viewer = resolve_viewer(&state, &headers).await?;
    let submission_id = parse_submission_id(&id)?;

    let comment = state
        .policy
        .comment_on_submission(viewer, submission_id, request.body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            id: comment.id.to_string(),
            user_id: comment.user_id.to_string(),
            body: comment.body,
        }),
    ))
}

fn to_summary(entry: SubmissionWithAuthor) -> SubmissionSummary {
    SubmissionSummary {
        id: entry.submission.id.to_string(),
        challenge_id: entry.submission.challenge_id.to_string(),
        user_id: entry.submission.user_id.to_string(),
        username: entry.username,
        public: entry.submission.public,
    }
}

// Malformed ids cannot name any row, so they answer the same way a
// missing row does.
fn parse_challenge_id(raw: &str) -> Result<ChallengeId, ApiError> {
    ChallengeId::from_str(raw).map_err(|_| ApiError::not_found())
}

fn parse_submission_id(raw: &str) -> Result<SubmissionId, ApiError> {
    SubmissionId::from_str(raw).map_err(|_| ApiError::not_found())
}
