//! Submission access policy.
//!
//! All role dispatch lives here: handlers resolve a viewer and a target,
//! the policy decides what that viewer may see or create. Students are
//! gated by the submit-to-unlock rule; instructors and admins review
//! everything.

use std::collections::HashSet;
use std::sync::Arc;

use codequest_core::domain::{ChallengeId, DomainError, Role, SubmissionBody, SubmissionId, UserId};
use thiserror::Error;

use crate::repository::{
    ChallengeRepository, CommentRecord, CommentRepository, NewComment, NewSourceFile,
    NewSubmission, SourceFileRecord, SubmissionRecord, SubmissionRepository, UserRepository,
};

/// The authenticated actor behind a request. Resolved upstream by the
/// identity layer; the policy never sees unauthenticated traffic.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub id: UserId,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AccessError {
    /// The target does not exist, or exists but the viewer is not allowed
    /// to know it does. Callers must not be able to tell the two apart.
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct SubmissionWithAuthor {
    pub submission: SubmissionRecord,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct VisibleSubmissions {
    pub submissions: Vec<SubmissionWithAuthor>,
    /// Set when a student has not submitted yet and peer submissions are
    /// being withheld, so the caller can explain the empty list.
    pub peers_hidden: bool,
}

#[derive(Debug, Clone)]
pub struct SubmissionDetail {
    pub submission: SubmissionRecord,
    pub username: String,
    pub source_files: Vec<SourceFileRecord>,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub body: String,
    pub public: bool,
    pub source_files: Vec<SourceFileDraft>,
}

#[derive(Debug, Clone)]
pub struct SourceFileDraft {
    pub filename: String,
    pub body: String,
}

pub struct AccessPolicy {
    users: Arc<dyn UserRepository>,
    challenges: Arc<dyn ChallengeRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl AccessPolicy {
    pub fn new(
        users: Arc<dyn UserRepository>,
        challenges: Arc<dyn ChallengeRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            challenges,
            submissions,
            comments,
        }
    }

    /// Submissions the viewer may see for a challenge.
    ///
    /// Instructors and admins see all of them. A student sees nothing
    /// until they have submitted at least once for this challenge;
    /// afterwards they see their own submissions plus every public one,
    /// deduplicated, in creation order.
    pub async fn visible_submissions(
        &self,
        viewer: Viewer,
        challenge_id: ChallengeId,
    ) -> Result<VisibleSubmissions, AccessError> {
        self.require_challenge(challenge_id).await?;

        if viewer.role.reviews_all_submissions() {
            let all = self.submissions.list_by_challenge(challenge_id).await?;
            return Ok(VisibleSubmissions {
                submissions: self.with_authors(all).await?,
                peers_hidden: false,
            });
        }

        let mine = self
            .submissions
            .list_by_user_and_challenge(viewer.id, challenge_id)
            .await?;

        if mine.is_empty() {
            return Ok(VisibleSubmissions {
                submissions: Vec::new(),
                peers_hidden: true,
            });
        }

        let mut seen: HashSet<SubmissionId> = mine.iter().map(|s| s.id).collect();
        let mut visible = mine;

        for submission in self
            .submissions
            .list_public_by_challenge(challenge_id)
            .await?
        {
            if seen.insert(submission.id) {
                visible.push(submission);
            }
        }

        Ok(VisibleSubmissions {
            submissions: self.with_authors(visible).await?,
            peers_hidden: false,
        })
    }

    /// Fetch a single submission with its source files and comments.
    ///
    /// For students, a submission owned by someone else answers exactly
    /// like a missing one.
    pub async fn fetch_submission(
        &self,
        viewer: Viewer,
        submission_id: SubmissionId,
    ) -> Result<SubmissionDetail, AccessError> {
        let submission = self.authorize_submission(viewer, submission_id).await?;

        let username = self.author_username(submission.user_id).await?;
        let source_files = self.submissions.list_source_files(submission.id).await?;
        let comments = self.comments.list_by_submission(submission.id).await?;

        Ok(SubmissionDetail {
            submission,
            username,
            source_files,
            comments,
        })
    }

    /// Create a submission owned by the viewer under a challenge.
    /// Submissions are immutable once created.
    pub async fn create_submission(
        &self,
        viewer: Viewer,
        challenge_id: ChallengeId,
        draft: SubmissionDraft,
    ) -> Result<SubmissionRecord, AccessError> {
        self.require_challenge(challenge_id).await?;

        let body = SubmissionBody::new(draft.body)?;

        let mut source_files = Vec::with_capacity(draft.source_files.len());
        for file in draft.source_files {
            if file.filename.trim().is_empty() {
                return Err(DomainError::EmptyFilename.into());
            }
            source_files.push(NewSourceFile {
                filename: file.filename,
                body: file.body,
            });
        }

        let record = self
            .submissions
            .create(NewSubmission {
                user_id: viewer.id,
                challenge_id,
                body: body.into_inner(),
                public: draft.public,
                source_files,
            })
            .await?;

        Ok(record)
    }

    /// Comment on a submission the viewer is allowed to fetch. The same
    /// not-found indistinguishability applies.
    pub async fn comment_on_submission(
        &self,
        viewer: Viewer,
        submission_id: SubmissionId,
        body: String,
    ) -> Result<CommentRecord, AccessError> {
        let submission = self.authorize_submission(viewer, submission_id).await?;

        let body = SubmissionBody::new(body)?;

        let comment = self
            .comments
            .create(NewComment {
                submission_id: submission.id,
                user_id: viewer.id,
                body: body.into_inner(),
            })
            .await?;

        Ok(comment)
    }

    async fn authorize_submission(
        &self,
        viewer: Viewer,
        submission_id: SubmissionId,
    ) -> Result<SubmissionRecord, AccessError> {
        let submission = self
            .submissions
            .find_by_id(submission_id)
            .await?
            .ok_or(AccessError::NotFound)?;

        if !viewer.role.reviews_all_submissions() && submission.user_id != viewer.id {
            return Err(AccessError::NotFound);
        }

        Ok(submission)
    }

    async fn require_challenge(&self, challenge_id: ChallengeId) -> Result<(), AccessError> {
        self.challenges
            .find_by_id(challenge_id)
            .await?
            .ok_or(AccessError::NotFound)?;
        Ok(())
    }

    async fn with_authors(
        &self,
        submissions: Vec<SubmissionRecord>,
    ) -> Result<Vec<SubmissionWithAuthor>, AccessError> {
        let mut out = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let username = self.author_username(submission.user_id).await?;
            out.push(SubmissionWithAuthor {
                submission,
                username,
            });
        }
        Ok(out)
    }

    async fn author_username(&self, user_id: UserId) -> Result<String, AccessError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("submission owner {user_id} missing from database"))?;
        Ok(user.username)
    }
}
