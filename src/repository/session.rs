//! Read-only view of the signed-in session persisted on disk.
//!
//! The session file is a flat JSON object, the same key/value shape the web
//! client keeps in local storage.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::types::AccessToken;
use crate::repository::errors::RepositoryResult;

/// Key under which the bearer credential is stored.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored value for `key`; a missing file means an empty session.
    pub fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let entries: HashMap<String, serde_json::Value> = serde_json::from_str(&contents)?;
        Ok(entries.get(key).and_then(|value| match value {
            serde_json::Value::String(text) => Some(text.clone()),
            _ => None,
        }))
    }

    pub fn access_token(&self) -> RepositoryResult<Option<AccessToken>> {
        Ok(self
            .get(ACCESS_TOKEN_KEY)?
            .and_then(|raw| AccessToken::new(raw).ok()))
    }
}
