//! Form handling: field edits on a profile draft and submit-time rules.

use thiserror::Error;

pub mod password;
pub mod profile;
pub mod validation;

#[derive(Debug, Error, PartialEq)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {0} expects a file")]
    ExpectedFile(String),

    #[error("field {0} does not accept files")]
    UnexpectedFile(String),

    #[error("field {0} is read-only")]
    ReadOnly(String),
}
