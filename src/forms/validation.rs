//! Submit-time rule tables.
//!
//! Rules run in table order and stop at the first violation; only that
//! rule's message is reported.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::password::PasswordChange;
use crate::domain::profile::ProfileRecord;
use crate::domain::types::{ContactNumber, ZipCode};

/// Special characters accepted (and one of which is required) in a new password.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&#^()_-";

pub const PASSWORD_MIN_LEN: usize = 6;

static PASSWORD_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9@$!%*?&#^()_\-]{6,}$").expect("password charset regex is valid")
});

/// A rule that failed, carrying the message shown to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationFailure {
    pub field: &'static str,
    pub message: &'static str,
}

/// Named predicate over a subject with its failure message.
pub struct Rule<T: ?Sized> {
    pub field: &'static str,
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

/// Evaluates `rules` in order, returning the first failure.
pub fn first_failure<T: ?Sized>(rules: &[Rule<T>], subject: &T) -> Result<(), ValidationFailure> {
    match rules.iter().find(|rule| !(rule.check)(subject)) {
        Some(rule) => Err(ValidationFailure {
            field: rule.field,
            message: rule.message,
        }),
        None => Ok(()),
    }
}

pub const CONTACT_MESSAGE: &str = "Contact number must be exactly 10 digits.";
pub const ZIP_MESSAGE: &str = "ZIP code must be exactly 6 digits.";

fn optional_zip_ok(zip: &str) -> bool {
    zip.is_empty() || ZipCode::new(zip).is_ok()
}

pub static PROFILE_RULES: [Rule<ProfileRecord>; 3] = [
    Rule {
        field: "contact",
        check: |draft| ContactNumber::new(draft.contact_str()).is_ok(),
        message: CONTACT_MESSAGE,
    },
    Rule {
        field: "currentAddress.zip",
        check: |draft| optional_zip_ok(draft.current_address.zip_str()),
        message: ZIP_MESSAGE,
    },
    Rule {
        field: "permanentAddress.zip",
        check: |draft| optional_zip_ok(draft.permanent_address.zip_str()),
        message: ZIP_MESSAGE,
    },
];

pub const REQUIRED_MESSAGE: &str = "All fields are required.";
pub const SAME_AS_CURRENT_MESSAGE: &str = "New password cannot be the same as current password.";
pub const MISMATCH_MESSAGE: &str = "New password and confirm password do not match.";
pub const STRENGTH_MESSAGE: &str = "Password must be at least 6 characters and include uppercase, lowercase, number, and special character.";

/// Minimum length, allowed alphabet, and one of each character class.
pub fn is_strong_password(password: &str) -> bool {
    PASSWORD_CHARSET.is_match(password)
        && password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub static PASSWORD_RULES: [Rule<PasswordChange>; 4] = [
    Rule {
        field: "all",
        check: |change| {
            !change.current_password.is_empty()
                && !change.new_password.is_empty()
                && !change.confirm_password.is_empty()
        },
        message: REQUIRED_MESSAGE,
    },
    Rule {
        field: "newPassword",
        check: |change| change.new_password != change.current_password,
        message: SAME_AS_CURRENT_MESSAGE,
    },
    Rule {
        field: "confirmPassword",
        check: |change| change.new_password == change.confirm_password,
        message: MISMATCH_MESSAGE,
    },
    Rule {
        field: "newPassword",
        check: |change| is_strong_password(&change.new_password),
        message: STRENGTH_MESSAGE,
    },
];

pub fn validate_profile(draft: &ProfileRecord) -> Result<(), ValidationFailure> {
    first_failure(&PROFILE_RULES, draft)
}

pub fn validate_password_change(change: &PasswordChange) -> Result<(), ValidationFailure> {
    first_failure(&PASSWORD_RULES, change)
}
