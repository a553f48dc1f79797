//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::password::PasswordChange;
use crate::domain::profile::ProfileRecord;
use crate::domain::types::{AccessToken, EmployeeId};
use crate::forms::profile::ProfileSubmission;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CredentialWriter, ProfileReader, ProfileWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl ProfileReader for Repository {
        async fn get_profile(&self, id: &EmployeeId) -> RepositoryResult<ProfileRecord>;
    }

    #[async_trait]
    impl ProfileWriter for Repository {
        async fn update_profile(
            &self,
            id: &EmployeeId,
            submission: ProfileSubmission,
        ) -> RepositoryResult<Option<ProfileRecord>>;

        async fn remove_profile_image(
            &self,
            id: &EmployeeId,
        ) -> RepositoryResult<Option<ProfileRecord>>;
    }

    #[async_trait]
    impl CredentialWriter for Repository {
        async fn change_password(
            &self,
            token: &AccessToken,
            change: &PasswordChange,
        ) -> RepositoryResult<Option<String>>;
    }
}
