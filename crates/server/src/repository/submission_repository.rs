use crate::entity::{source_file, submission};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use codequest_core::domain::{ChallengeId, SourceFileId, SubmissionId, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub body: String,
    pub public: bool,
}

#[derive(Debug, Clone)]
pub struct SourceFileRecord {
    pub id: SourceFileId,
    pub submission_id: SubmissionId,
    pub filename: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub body: String,
    pub public: bool,
    pub source_files: Vec<NewSourceFile>,
}

#[derive(Debug, Clone)]
pub struct NewSourceFile {
    pub filename: String,
    pub body: String,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>>;
    async fn list_by_user_and_challenge(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>>;
    async fn list_by_challenge(&self, challenge_id: ChallengeId) -> Result<Vec<SubmissionRecord>>;
    async fn list_public_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>>;
    /// Source files for one submission, ordered by filename.
    async fn list_source_files(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<SourceFileRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: submission::Model) -> Result<SubmissionRecord> {
        let id = SubmissionId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid submission.id '{}' from database: {e}", model.id))?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid submission.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;
        let challenge_id = ChallengeId::from_str(&model.challenge_id).map_err(|e| {
            anyhow!(
                "invalid submission.challenge_id '{}' from database: {e}",
                model.challenge_id
            )
        })?;

        Ok(SubmissionRecord {
            id,
            user_id,
            challenge_id,
            body: model.body,
            public: model.public,
        })
    }

    fn map_source_file_model(model: source_file::Model) -> Result<SourceFileRecord> {
        let id = SourceFileId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid source_file.id '{}' from database: {e}", model.id))?;
        let submission_id = SubmissionId::from_str(&model.submission_id).map_err(|e| {
            anyhow!(
                "invalid source_file.submission_id '{}' from database: {e}",
                model.submission_id
            )
        })?;

        Ok(SourceFileRecord {
            id,
            submission_id,
            filename: model.filename,
            body: model.body,
        })
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let id = SubmissionId::new();

        // The submission row and its source files land together or not
        // at all; a half-persisted submission would count toward the
        // submit-to-unlock gate with no way to repair it.
        let model = self
            .db
            .transaction::<_, submission::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    let active_model = submission::ActiveModel {
                        id: Set(id.to_string()),
                        user_id: Set(new_submission.user_id.to_string()),
                        challenge_id: Set(new_submission.challenge_id.to_string()),
                        body: Set(new_submission.body),
                        public: Set(new_submission.public),
                        ..Default::default()
                    };

                    let model = active_model.insert(txn).await?;

                    for file in new_submission.source_files {
                        let file_model = source_file::ActiveModel {
                            id: Set(SourceFileId::new().to_string()),
                            submission_id: Set(id.to_string()),
                            filename: Set(file.filename),
                            body: Set(file.body),
                            ..Default::default()
                        };
                        file_model.insert(txn).await?;
                    }

                    Ok(model)
                })
            })
            .await?;

        Self::map_model(model)
    }

    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_by_user_and_challenge(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::UserId.eq(user_id.to_string()))
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .order_by_asc(submission::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_challenge(&self, challenge_id: ChallengeId) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .order_by_asc(submission::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_public_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .filter(submission::Column::Public.eq(true))
            .order_by_asc(submission::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_source_files(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<SourceFileRecord>> {
        let models = source_file::Entity::find()
            .filter(source_file::Column::SubmissionId.eq(submission_id.to_string()))
            .order_by_asc(source_file::Column::Filename)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(Self::map_source_file_model)
            .collect()
    }
}
