//! JSON envelopes exchanged with the backend.

use serde::Deserialize;

use crate::domain::profile::ProfileRecord;

/// Body of update and image-removal responses.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeEnvelope {
    #[serde(default)]
    pub employee: Option<ProfileRecord>,
}

/// `{ "message": ... }` body used for both success and error responses.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageBody {
    /// Parses a body leniently; anything that is not the expected shape has no message.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}
