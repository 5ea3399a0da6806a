//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Domain failures are raised as [`RatingError`] and
//! can be recovered from an `anyhow::Error` with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Unknown team: {team}")]
    UnknownTeam { team: String },

    #[error("Degenerate sample: {reason}")]
    DegenerateSample { reason: String },

    #[error("Invalid match record at line {line}: {reason}")]
    InvalidMatchRecord { line: usize, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RatingError {
    pub(crate) fn invalid_parameter(reason: impl Into<String>) -> anyhow::Error {
        RatingError::InvalidParameter {
            reason: reason.into(),
        }
        .into()
    }

    pub(crate) fn degenerate_sample(reason: impl Into<String>) -> anyhow::Error {
        RatingError::DegenerateSample {
            reason: reason.into(),
        }
        .into()
    }
}

/// Extract the [`RatingError`] kind carried by an error chain, if any
pub fn rating_error(err: &anyhow::Error) -> Option<&RatingError> {
    err.chain().find_map(|cause| cause.downcast_ref::<RatingError>())
}
