//! Access to the employee backend and to the locally persisted session.

use async_trait::async_trait;

use crate::{
    domain::{
        password::PasswordChange,
        profile::ProfileRecord,
        types::{AccessToken, EmployeeId},
    },
    forms::profile::ProfileSubmission,
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod http;
pub mod session;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;
pub use session::SessionStore;

#[async_trait]
pub trait ProfileReader: Send + Sync {
    async fn get_profile(&self, id: &EmployeeId) -> RepositoryResult<ProfileRecord>;
}

#[async_trait]
pub trait ProfileWriter: Send + Sync {
    /// Multipart update; returns the stored record when the backend echoes it.
    async fn update_profile(
        &self,
        id: &EmployeeId,
        submission: ProfileSubmission,
    ) -> RepositoryResult<Option<ProfileRecord>>;

    async fn remove_profile_image(&self, id: &EmployeeId)
    -> RepositoryResult<Option<ProfileRecord>>;
}

#[async_trait]
pub trait CredentialWriter: Send + Sync {
    /// Returns the backend's confirmation message, if it sent one.
    async fn change_password(
        &self,
        token: &AccessToken,
        change: &PasswordChange,
    ) -> RepositoryResult<Option<String>>;
}
