//! Error types for the authentication client

use common::error::StorageError;
use thiserror::Error;

/// Errors raised by the session store and the auth service
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Client-side check failed before any request was sent
    #[error("{0}")]
    Validation(String),

    /// The backend refused the credentials
    #[error("{0}")]
    InvalidCredentials(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// An authenticated call was attempted without a stored token
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The session storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The backend answered with a body that could not be decoded
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AuthError {
    /// HTTP status of a backend rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            AuthError::InvalidCredentials(_) => Some(401),
            _ => None,
        }
    }
}

/// Type alias for auth client results
pub type AuthResult<T> = Result<T, AuthError>;
