use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::access::AccessPolicy;
use crate::repository::{
    ChallengeRepository, SeaOrmChallengeRepository, SeaOrmCommentRepository,
    SeaOrmSubmissionRepository, SeaOrmUserRepository, UserRepository,
};

/// Shared application state: the access policy plus the repositories the
/// handlers talk to directly (viewer resolution, registration).
pub struct AppState {
    pub policy: AccessPolicy,
    pub users: Arc<dyn UserRepository>,
    pub challenges: Arc<dyn ChallengeRepository>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let challenges: Arc<dyn ChallengeRepository> =
            Arc::new(SeaOrmChallengeRepository::new(db.clone()));
        let submissions = Arc::new(SeaOrmSubmissionRepository::new(db.clone()));
        let comments = Arc::new(SeaOrmCommentRepository::new(db));

        let policy = AccessPolicy::new(
            users.clone(),
            challenges.clone(),
            submissions,
            comments,
        );

        Self {
            policy,
            users,
            challenges,
        }
    }
}
