use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput(field.to_string(), reason.into())
    }

    /// The name of the form field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            CoreError::InvalidInput(field, _) => field,
        }
    }
}
