//! Working state of the change-password form.

use crate::domain::password::{PasswordChange, PasswordField, PasswordVisibility};

/// Inputs, visibility toggles and the last outcome message of the form.
#[derive(Clone, Debug, Default)]
pub struct PasswordChangeForm {
    pub inputs: PasswordChange,
    pub visibility: PasswordVisibility,
    pub error: Option<String>,
    pub success: Option<String>,
    pub in_flight: bool,
}

impl PasswordChangeForm {
    pub fn set_input(&mut self, field: PasswordField, value: impl Into<String>) {
        self.inputs.set(field, value);
    }

    pub fn toggle_visibility(&mut self, field: PasswordField) {
        self.visibility.toggle(field);
    }

    /// Clears both messages ahead of a new attempt.
    pub fn reset_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}
