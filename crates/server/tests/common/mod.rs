use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use codequest_core::domain::{ChallengeId, CommentId, Role, SourceFileId, SubmissionId, UserId};
use codequest_server::access::AccessPolicy;
use codequest_server::repository::{
    ChallengeRecord, ChallengeRepository, CommentRecord, CommentRepository, NewChallenge,
    NewComment, NewSubmission, NewUser, SourceFileRecord, SubmissionRecord, SubmissionRepository,
    UserRecord, UserRepository,
};

/// In-memory stand-ins for the sea-orm repositories, shared between the
/// policy under test and the test body.
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<UserRecord>>,
    challenges: Mutex<Vec<ChallengeRecord>>,
    submissions: Mutex<Vec<SubmissionRecord>>,
    source_files: Mutex<Vec<SourceFileRecord>>,
    comments: Mutex<Vec<CommentRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn policy(store: &Arc<Self>) -> AccessPolicy {
        AccessPolicy::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        )
    }

    pub fn add_user(&self, username: &str, role: Role) -> UserId {
        let id = UserId::new();
        self.users.lock().unwrap().push(UserRecord {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role,
        });
        id
    }

    pub fn add_challenge(&self, title: &str) -> ChallengeId {
        let id = ChallengeId::new();
        self.challenges.lock().unwrap().push(ChallengeRecord {
            id,
            title: title.to_string(),
            description: "solve it".to_string(),
        });
        id
    }

    pub fn add_submission(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        public: bool,
    ) -> SubmissionId {
        let id = SubmissionId::new();
        self.submissions.lock().unwrap().push(SubmissionRecord {
            id,
            user_id,
            challenge_id,
            body: "a = 1".to_string(),
            public,
        });
        id
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let record = UserRecord {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            role: new_user.role,
        };
        self.users.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryStore {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord> {
        let record = ChallengeRecord {
            id: ChallengeId::new(),
            title: new_challenge.title,
            description: new_challenge.description,
        };
        self.challenges.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == challenge_id)
            .cloned())
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let record = SubmissionRecord {
            id: SubmissionId::new(),
            user_id: new_submission.user_id,
            challenge_id: new_submission.challenge_id,
            body: new_submission.body,
            public: new_submission.public,
        };
        self.submissions.lock().unwrap().push(record.clone());

        for file in new_submission.source_files {
            self.source_files.lock().unwrap().push(SourceFileRecord {
                id: SourceFileId::new(),
                submission_id: record.id,
                filename: file.filename,
                body: file.body,
            });
        }

        Ok(record)
    }

    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == submission_id)
            .cloned())
    }

    async fn list_by_user_and_challenge(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.challenge_id == challenge_id)
            .cloned()
            .collect())
    }

    async fn list_by_challenge(&self, challenge_id: ChallengeId) -> Result<Vec<SubmissionRecord>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.challenge_id == challenge_id)
            .cloned()
            .collect())
    }

    async fn list_public_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.challenge_id == challenge_id && s.public)
            .cloned()
            .collect())
    }

    async fn list_source_files(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<SourceFileRecord>> {
        let mut files: Vec<SourceFileRecord> = self
            .source_files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.submission_id == submission_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, new_comment: NewComment) -> Result<CommentRecord> {
        let record = CommentRecord {
            id: CommentId::new(),
            submission_id: new_comment.submission_id,
            user_id: new_comment.user_id,
            body: new_comment.body,
        };
        self.comments.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_by_submission(&self, submission_id: SubmissionId) -> Result<Vec<CommentRecord>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.submission_id == submission_id)
            .cloned()
            .collect())
    }
}
