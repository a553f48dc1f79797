//! Password change workflow for the signed-in user.

use crate::domain::types::AccessToken;
use crate::forms::password::PasswordChangeForm;
use crate::forms::validation::validate_password_change;
use crate::repository::CredentialWriter;
use crate::services::{ServiceError, ServiceResult};

pub const PASSWORD_CHANGED_MESSAGE: &str = "Password updated successfully.";
pub const PASSWORD_CHANGE_FAILED_MESSAGE: &str = "Failed to change password.";

/// Validates the form and, when it passes, submits a single change request.
///
/// On success the three inputs are cleared; on failure they are kept so the
/// user can correct them. The outcome message is also stored on the form.
pub async fn change_password<R>(
    form: &mut PasswordChangeForm,
    token: Option<&AccessToken>,
    repo: &R,
) -> ServiceResult<String>
where
    R: CredentialWriter + ?Sized,
{
    form.reset_messages();

    if let Err(failure) = validate_password_change(&form.inputs) {
        form.error = Some(failure.message.to_string());
        return Err(failure.into());
    }

    let Some(token) = token else {
        log::warn!("Password change attempted without an access token");
        form.error = Some(ServiceError::MissingCredential.to_string());
        return Err(ServiceError::MissingCredential);
    };

    form.in_flight = true;
    let result = repo.change_password(token, &form.inputs).await;
    form.in_flight = false;

    match result {
        Ok(message) => {
            let message = message.unwrap_or_else(|| PASSWORD_CHANGED_MESSAGE.to_string());
            log::info!("Password changed");
            form.inputs.clear();
            form.success = Some(message.clone());
            Ok(message)
        }
        Err(err) => {
            log::error!("Failed to change password: {err}");
            let message = err
                .server_message()
                .unwrap_or(PASSWORD_CHANGE_FAILED_MESSAGE)
                .to_string();
            form.error = Some(message.clone());
            Err(ServiceError::PasswordChange(message))
        }
    }
}
