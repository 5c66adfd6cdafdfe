use thiserror::Error;

/// Rejection of malformed structured input, raised before any network call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("unsupported tone `{0}` (expected Professional|Friendly|Formal|Creative)")]
    UnknownTone(String),
}

/// A workflow step was invoked without its required prior state.
///
/// These are programming-error class failures: the caller skipped a step,
/// not the user. They are still surfaced as recoverable errors, never panics.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("session state accessed before the workflow was entered")]
    SessionNotEntered,
    #[error("project description is not available")]
    MissingProjectDescription,
    #[error("form data is missing")]
    MissingFormData,
    #[error("recipient address is missing")]
    MissingRecipient,
}

impl PreconditionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SessionNotEntered => "The quotation workflow has not been started.",
            Self::MissingProjectDescription => "Project description is not available.",
            Self::MissingFormData => "Form data is missing.",
            Self::MissingRecipient => "Please enter a recipient email.",
        }
    }
}
