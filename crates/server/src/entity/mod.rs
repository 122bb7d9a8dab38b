pub mod challenge;
pub mod comment;
pub mod source_file;
pub mod submission;
pub mod user;
