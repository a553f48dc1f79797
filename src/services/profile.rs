//! Profile workflows: fetch, validated submission and image removal.

use crate::domain::profile::ProfileRecord;
use crate::domain::types::EmployeeId;
use crate::forms::profile::ProfileSubmission;
use crate::forms::validation::validate_profile;
use crate::repository::{ProfileReader, ProfileWriter};
use crate::services::{ServiceError, ServiceResult};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch profile";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to update profile.";
pub const SAVE_SUCCESS_MESSAGE: &str = "Profile updated successfully!";
pub const IMAGE_REMOVAL_FAILED_MESSAGE: &str = "Failed to remove image.";

/// Reads the authoritative profile from the backend.
pub async fn fetch_profile<R>(repo: &R, id: &EmployeeId) -> ServiceResult<ProfileRecord>
where
    R: ProfileReader + ?Sized,
{
    repo.get_profile(id).await.map_err(|err| {
        log::error!("Failed to fetch profile {id}: {err}");
        ServiceError::FetchFailure(FETCH_FAILED_MESSAGE.to_string())
    })
}

/// Validates the draft and sends it as a single multipart update.
///
/// Nothing is sent when a rule fails.
pub async fn submit_profile<R>(repo: &R, id: &EmployeeId, draft: &ProfileRecord) -> ServiceResult<()>
where
    R: ProfileWriter + ?Sized,
{
    validate_profile(draft).inspect_err(|failure| {
        log::warn!("Profile {id} failed validation on {}: {failure}", failure.field);
    })?;

    let submission = ProfileSubmission::try_from(draft).map_err(|err| {
        log::error!("Failed to serialize profile {id}: {err}");
        ServiceError::PersistFailure(SAVE_FAILED_MESSAGE.to_string())
    })?;

    repo.update_profile(id, submission).await.map_err(|err| {
        log::error!("Failed to update profile {id}: {err}");
        ServiceError::PersistFailure(SAVE_FAILED_MESSAGE.to_string())
    })?;

    Ok(())
}

/// Deletes the stored profile image, returning the record the backend echoed.
pub async fn remove_profile_image<R>(repo: &R, id: &EmployeeId) -> ServiceResult<Option<ProfileRecord>>
where
    R: ProfileWriter + ?Sized,
{
    repo.remove_profile_image(id).await.map_err(|err| {
        log::error!("Failed to remove image of profile {id}: {err}");
        ServiceError::ImageRemoval(IMAGE_REMOVAL_FAILED_MESSAGE.to_string())
    })
}
