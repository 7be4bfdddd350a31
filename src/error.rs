// src/error.rs
//! Error taxonomy shared by every pipeline operation.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure a pipeline operation can resolve to, exactly one per
/// failed call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A precondition caught before any network call; actionable by the
    /// user without a round-trip.
    #[error("{0}")]
    Validation(String),

    /// The server answered with an error; the message is its `detail` field
    /// when present.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The request could not complete, or the response was malformed.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
