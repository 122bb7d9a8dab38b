mod challenge_repository;
mod comment_repository;
mod submission_repository;
mod user_repository;

pub use challenge_repository::{
    ChallengeRecord, ChallengeRepository, NewChallenge, SeaOrmChallengeRepository,
};
pub use comment_repository::{CommentRecord, CommentRepository, NewComment, SeaOrmCommentRepository};
pub use submission_repository::{
    NewSourceFile, NewSubmission, SeaOrmSubmissionRepository, SourceFileRecord, SubmissionRecord,
    SubmissionRepository,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};
