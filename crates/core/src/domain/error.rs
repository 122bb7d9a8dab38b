use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("submission body must not be empty")]
    EmptyBody,

    #[error("source file name must not be empty")]
    EmptyFilename,
}
