//! Errors raised while talking to the employee backend or the session file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend answered 404, optionally with its own message.
    #[error("Entity not found")]
    NotFound { message: Option<String> },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered with a non-success status.
    #[error("Request rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RepositoryError {
    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RepositoryError::NotFound { message } | RepositoryError::Rejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::InvalidResponse(err.to_string())
        } else if err.is_connect() || err.is_timeout() {
            RepositoryError::ConnectionError(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Rejected {
                status: status.as_u16(),
                message: None,
            }
        } else {
            RepositoryError::Unexpected(format!("Unexpected HTTP error: {err}"))
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InvalidResponse(format!("Serialization error: {err}"))
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::StorageError(err.to_string())
    }
}
