//! Password change request and form field identifiers.

use serde::Serialize;

/// One of the three inputs of the change-password form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordField {
    Current,
    New,
    Confirm,
}

/// Password-change request body, also the form's working copy.
#[derive(Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange")
            .field("current_password", &"***")
            .field("new_password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

impl PasswordChange {
    pub fn new(
        current_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn set(&mut self, field: PasswordField, value: impl Into<String>) {
        let slot = match field {
            PasswordField::Current => &mut self.current_password,
            PasswordField::New => &mut self.new_password,
            PasswordField::Confirm => &mut self.confirm_password,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Show/hide toggles for the password inputs. Purely presentational.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PasswordVisibility {
    pub current: bool,
    pub new: bool,
    pub confirm: bool,
}

impl PasswordVisibility {
    pub fn toggle(&mut self, field: PasswordField) {
        let flag = match field {
            PasswordField::Current => &mut self.current,
            PasswordField::New => &mut self.new,
            PasswordField::Confirm => &mut self.confirm,
        };
        *flag = !*flag;
    }

    pub fn is_visible(&self, field: PasswordField) -> bool {
        match field {
            PasswordField::Current => self.current,
            PasswordField::New => self.new,
            PasswordField::Confirm => self.confirm,
        }
    }
}
