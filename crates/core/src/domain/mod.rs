mod body;
mod error;
mod ids;
mod role;

pub use body::SubmissionBody;
pub use error::DomainError;
pub use ids::{ChallengeId, CommentId, SourceFileId, SubmissionId, UserId};
pub use role::Role;
