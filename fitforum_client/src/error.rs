use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForumError>;

/// Failures surfaced by the forum client and the thread controllers.
///
/// None of these are fatal to the application: every variant is scoped to the
/// view that triggered it and can be retried by repeating the user action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForumError {
    /// Input rejected locally; no request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Network or server failure.
    #[error("{operation} failed: {reason}")]
    Fetch {
        operation: &'static str,
        reason: String,
    },

    /// The server answered but the payload could not be understood.
    #[error("{operation} returned an unreadable response: {reason}")]
    Decode {
        operation: &'static str,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ForumError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn fetch(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn decode(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
