//! reqwest-backed implementation of the backend traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};

use crate::domain::password::PasswordChange;
use crate::domain::profile::ProfileRecord;
use crate::domain::types::{AccessToken, EmployeeId};
use crate::forms::profile::{ProfileSubmission, SubmissionPart};
use crate::models::config::ClientConfig;
use crate::models::wire::{EmployeeEnvelope, MessageBody};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CredentialWriter, ProfileReader, ProfileWriter};

/// HTTP client for the employee backend.
#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid base url: {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> RepositoryResult<Self> {
        Self::new(&config.api_base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> RepositoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Unexpected("Base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Turns a non-success response into a [`RepositoryError`].
    async fn check_status(response: reqwest::Response) -> RepositoryResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = MessageBody::parse(&text).message;
        match status {
            StatusCode::NOT_FOUND => Err(RepositoryError::NotFound { message }),
            _ => Err(RepositoryError::Rejected {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Reads an optional `{ employee }` envelope, tolerating empty bodies.
    async fn read_envelope(response: reqwest::Response) -> RepositoryResult<Option<ProfileRecord>> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<EmployeeEnvelope>(&text) {
            Ok(envelope) => Ok(envelope.employee),
            Err(err) => {
                log::warn!("Ignoring unexpected response body: {err}");
                Ok(None)
            }
        }
    }
}

fn build_form(submission: ProfileSubmission) -> RepositoryResult<Form> {
    let mut form = Form::new();
    for (name, part) in submission.into_parts() {
        form = match part {
            SubmissionPart::Text(value) => form.text(name, value),
            SubmissionPart::File(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime_type)
                    .map_err(|e| RepositoryError::Unexpected(format!("Invalid mime type: {e}")))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl ProfileReader for HttpRepository {
    async fn get_profile(&self, id: &EmployeeId) -> RepositoryResult<ProfileRecord> {
        let url = self.endpoint(&["employees", id.as_str()])?;
        log::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<ProfileRecord>().await?)
    }
}

#[async_trait]
impl ProfileWriter for HttpRepository {
    async fn update_profile(
        &self,
        id: &EmployeeId,
        submission: ProfileSubmission,
    ) -> RepositoryResult<Option<ProfileRecord>> {
        let url = self.endpoint(&["employees", id.as_str()])?;
        log::debug!("PUT {url} ({} parts)", submission.parts().len());

        let form = build_form(submission)?;
        let response = self.client.put(url).multipart(form).send().await?;
        let response = Self::check_status(response).await?;
        Self::read_envelope(response).await
    }

    async fn remove_profile_image(
        &self,
        id: &EmployeeId,
    ) -> RepositoryResult<Option<ProfileRecord>> {
        let url = self.endpoint(&["employees", id.as_str(), "image"])?;
        log::debug!("DELETE {url}");

        let response = self.client.delete(url).send().await?;
        let response = Self::check_status(response).await?;
        Self::read_envelope(response).await
    }
}

#[async_trait]
impl CredentialWriter for HttpRepository {
    async fn change_password(
        &self,
        token: &AccessToken,
        change: &PasswordChange,
    ) -> RepositoryResult<Option<String>> {
        let url = self.endpoint(&["change-password"])?;
        log::debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .json(change)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        Ok(MessageBody::parse(&text).message)
    }
}
