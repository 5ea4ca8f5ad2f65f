//! Error taxonomy for report submissions

use thiserror::Error;

/// Message shown when the endpoint gives us nothing better to say
pub const GENERIC_UPLOAD_FAILURE: &str = "Upload failed.";

/// Local checks run before any network activity
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a CSV file first.")]
    FileRequired,

    #[error("Year must be four digits, e.g. 2024.")]
    YearFormat,
}

/// Every way a submission can end in `Failed`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Rejected locally, no request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No response arrived (connect failure, timeout, broken body)
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The endpoint answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Remote { status: u16, message: String },
}

impl SubmissionError {
    pub fn transport(message: impl Into<String>) -> Self {
        SubmissionError::Transport {
            message: message.into(),
        }
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        SubmissionError::Remote {
            status,
            message: message.into(),
        }
    }

    /// Text for the session's error message.
    ///
    /// Transport details go to the log, the user only sees the generic
    /// message. Remote messages are already classified at parse time.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Validation(err) => err.to_string(),
            SubmissionError::Transport { .. } => GENERIC_UPLOAD_FAILURE.to_string(),
            SubmissionError::Remote { message, .. } => message.clone(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SubmissionError::Validation(_))
    }
}
