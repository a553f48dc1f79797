//! Workflows driving the settings panels.

use thiserror::Error;

use crate::forms::FormError;
use crate::forms::validation::ValidationFailure;

pub mod password;
pub mod profile;
pub mod settings;

/// Failures surfaced to the user. Every variant ends the current attempt.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("profile identifier is missing")]
    MissingIdentifier,

    #[error("{0}")]
    FetchFailure(String),

    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("{0}")]
    PersistFailure(String),

    #[error("{0}")]
    ImageRemoval(String),

    #[error("{0}")]
    PasswordChange(String),

    #[error("not signed in: no access token available")]
    MissingCredential,

    #[error("profile is not in edit mode")]
    NotEditing,

    #[error("profile has not been loaded")]
    NotLoaded,

    #[error("this panel does not allow editing")]
    ReadOnly,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
