use super::DomainError;

/// Submission text validated to be non-empty. Whitespace-only bodies are
/// rejected the same way absent ones are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionBody(String);

impl SubmissionBody {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(DomainError::EmptyBody)
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SubmissionBody {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubmissionBody> for String {
    fn from(value: SubmissionBody) -> Self {
        value.into_inner()
    }
}
