use thiserror::Error;

/// Reasons a user intent is rejected. Rejection leaves the store unchanged
/// and is never fatal; the caller reports the message and carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}
