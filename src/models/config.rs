//! Configuration model loaded from external sources.

use serde::Deserialize;
use validator::Validate;

fn default_timeout_secs() -> u64 {
    30
}

fn default_session_file() -> String {
    "session.json".to_string()
}

/// Base locations used to turn stored document references into links.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AssetUrls {
    /// Generic uploads folder, used for plain file links.
    #[validate(url)]
    pub upload_base: String,
    /// Folder serving profile images.
    #[validate(url)]
    pub image_base: String,
    /// Raw-upload prefix of the document host.
    #[validate(url)]
    pub raw_upload_base: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Settings for talking to the employee backend.
pub struct ClientConfig {
    #[validate(url)]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    /// JSON file holding the signed-in session (`accessToken`).
    #[serde(default = "default_session_file")]
    #[validate(length(min = 1))]
    pub session_file: String,
    #[validate(nested)]
    pub assets: AssetUrls,
    /// Whether admins may edit the permanent address.
    #[serde(default)]
    pub permanent_address_editable: bool,
}
