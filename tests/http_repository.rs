mod common;

use hr_settings::domain::password::PasswordChange;
use hr_settings::domain::profile::{Document, FileUpload, ProfileRecord};
use hr_settings::domain::types::{AccessToken, EmployeeId};
use hr_settings::forms::profile::ProfileSubmission;
use hr_settings::repository::errors::RepositoryError;
use hr_settings::repository::{CredentialWriter, HttpRepository, ProfileReader, ProfileWriter};
use std::time::Duration;

use common::{DELETED_USER_TOKEN, TOKEN, closed_base_url, start_backend};

fn emp(id: &str) -> EmployeeId {
    EmployeeId::new(id).expect("valid id")
}

fn token(raw: &str) -> AccessToken {
    AccessToken::new(raw).expect("valid token")
}

#[actix_web::test]
async fn get_profile_defaults_null_sections() {
    let backend = start_backend();
    let repo = backend.repository();

    let profile = repo.get_profile(&emp("emp-1")).await.expect("profile");

    assert_eq!(profile.name.as_deref(), Some("Asha Rao"));
    assert_eq!(profile.current_address.city.as_deref(), Some("Kolkata"));
    assert_eq!(profile.permanent_address, Default::default());
    assert_eq!(profile.image, Some(Document::Remote("avatars/asha.png".into())));
    assert!(profile.extra.contains_key("_id"));
}

#[actix_web::test]
async fn get_profile_tolerates_loosely_typed_scalars() {
    let backend = start_backend();
    backend.state.lock().unwrap().profiles.insert(
        "emp-2".to_string(),
        serde_json::json!({ "name": "Ravi", "contact": 9876543210u64, "salary": "52000" }),
    );
    let repo = backend.repository();

    let profile = repo.get_profile(&emp("emp-2")).await.expect("profile");

    assert_eq!(profile.contact_str(), "9876543210");
    assert_eq!(profile.salary, Some(52000.0));
}

#[actix_web::test]
async fn unknown_profile_is_not_found() {
    let backend = start_backend();
    let repo = backend.repository();

    let result = repo.get_profile(&emp("nobody")).await;

    let err = result.expect_err("missing employee");
    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert_eq!(err.server_message(), Some("Employee not found"));
}

#[actix_web::test]
async fn update_sends_nested_json_and_pending_files() {
    let backend = start_backend();
    let repo = backend.repository();
    let mut draft: ProfileRecord = repo.get_profile(&emp("emp-1")).await.expect("profile");
    draft.contact = Some("9123456780".into());
    draft.current_address.street = Some("  Lake Road ".into());
    draft.pan_card_pdf = Some(Document::Pending(FileUpload::new(
        "pan.pdf",
        "application/pdf",
        b"%PDF-1.4".to_vec(),
    )));
    let submission = ProfileSubmission::try_from(&draft).expect("submission");

    let echoed = repo
        .update_profile(&emp("emp-1"), submission)
        .await
        .expect("update");

    let stored = backend.profile("emp-1");
    assert_eq!(stored["contact"], "9123456780");
    assert_eq!(stored["currentAddress"]["street"], "Lake Road");
    assert_eq!(stored["panCardPdf"], "uploads/pan.pdf");
    assert_eq!(
        backend.state.lock().unwrap().uploaded_files,
        vec![("panCardPdf".to_string(), "pan.pdf".to_string())]
    );
    let echoed = echoed.expect("backend echoes the employee");
    assert_eq!(echoed.contact.as_deref(), Some("9123456780"));
}

#[actix_web::test]
async fn remove_image_returns_updated_employee() {
    let backend = start_backend();
    let repo = backend.repository();

    let echoed = repo
        .remove_profile_image(&emp("emp-1"))
        .await
        .expect("remove image");

    let echoed = echoed.expect("backend echoes the employee");
    assert_eq!(echoed.image, None);
    assert_eq!(echoed.name.as_deref(), Some("Asha Rao"));
}

#[actix_web::test]
async fn remove_image_failure_carries_server_message() {
    let backend = start_backend();
    let repo = backend.repository();

    let err = repo
        .remove_profile_image(&emp("broken"))
        .await
        .expect_err("server error");

    assert!(matches!(err, RepositoryError::Rejected { status: 500, .. }));
    assert_eq!(err.server_message(), Some("Image store unavailable"));
}

#[actix_web::test]
async fn change_password_uses_bearer_token() {
    let backend = start_backend();
    let repo = backend.repository();
    let change = PasswordChange::new("Old#pass1", "Abcdef1!", "Abcdef1!");

    let message = repo
        .change_password(&token(TOKEN), &change)
        .await
        .expect("change password");

    assert_eq!(message.as_deref(), Some("Password changed successfully"));
    assert_eq!(backend.state.lock().unwrap().password, "Abcdef1!");
}

#[actix_web::test]
async fn change_password_rejections_keep_message() {
    let backend = start_backend();
    let repo = backend.repository();
    let wrong_current = PasswordChange::new("Nope#123", "Abcdef1!", "Abcdef1!");

    let err = repo
        .change_password(&token(TOKEN), &wrong_current)
        .await
        .expect_err("rejected");
    assert_eq!(err.server_message(), Some("Current password is incorrect"));

    let err = repo
        .change_password(&token("stale"), &wrong_current)
        .await
        .expect_err("unauthorized");
    assert!(matches!(err, RepositoryError::Rejected { status: 401, .. }));
}

#[actix_web::test]
async fn change_password_not_found_keeps_message() {
    let backend = start_backend();
    let repo = backend.repository();
    let change = PasswordChange::new("Old#pass1", "Abcdef1!", "Abcdef1!");

    let err = repo
        .change_password(&token(DELETED_USER_TOKEN), &change)
        .await
        .expect_err("unknown user");

    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert_eq!(err.server_message(), Some("User not found"));
}

#[actix_web::test]
async fn unreachable_backend_is_connection_error() {
    let repo = HttpRepository::new(&closed_base_url(), Duration::from_secs(2)).expect("repo");

    let result = repo.get_profile(&emp("emp-1")).await;

    assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));
}
