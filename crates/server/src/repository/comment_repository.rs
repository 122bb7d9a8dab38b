use crate::entity::comment;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use codequest_core::domain::{CommentId, SubmissionId, UserId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: CommentId,
    pub submission_id: SubmissionId,
    pub user_id: UserId,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub submission_id: SubmissionId,
    pub user_id: UserId,
    pub body: String,
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new_comment: NewComment) -> Result<CommentRecord>;
    async fn list_by_submission(&self, submission_id: SubmissionId) -> Result<Vec<CommentRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmCommentRepository {
    db: DatabaseConnection,
}

impl SeaOrmCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: comment::Model) -> Result<CommentRecord> {
        let id = CommentId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid comment.id '{}' from database: {e}", model.id))?;
        let submission_id = SubmissionId::from_str(&model.submission_id).map_err(|e| {
            anyhow!(
                "invalid comment.submission_id '{}' from database: {e}",
                model.submission_id
            )
        })?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid comment.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;

        Ok(CommentRecord {
            id,
            submission_id,
            user_id,
            body: model.body,
        })
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<CommentRecord> {
        let id = CommentId::new();

        let active_model = comment::ActiveModel {
            id: Set(id.to_string()),
            submission_id: Set(new_comment.submission_id.to_string()),
            user_id: Set(new_comment.user_id.to_string()),
            body: Set(new_comment.body),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn list_by_submission(&self, submission_id: SubmissionId) -> Result<Vec<CommentRecord>> {
        let models = comment::Entity::find()
            .filter(comment::Column::SubmissionId.eq(submission_id.to_string()))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
