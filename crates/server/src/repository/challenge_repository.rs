use crate::entity::challenge;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use codequest_core::domain::ChallengeId;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
}

#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord>;
    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmChallengeRepository {
    db: DatabaseConnection,
}

impl SeaOrmChallengeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: challenge::Model) -> Result<ChallengeRecord> {
        let id = ChallengeId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid challenge.id '{}' from database: {e}", model.id))?;

        Ok(ChallengeRecord {
            id,
            title: model.title,
            description: model.description,
        })
    }
}

#[async_trait]
impl ChallengeRepository for SeaOrmChallengeRepository {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord> {
        let id = ChallengeId::new();

        let active_model = challenge::ActiveModel {
            id: Set(id.to_string()),
            title: Set(new_challenge.title),
            description: Set(new_challenge.description),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>> {
        let model = challenge::Entity::find_by_id(challenge_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }
}
