//! Settings panel state: tab selection, the profile snapshot/draft pair and
//! the password form.

use crate::domain::profile::ProfileRecord;
use crate::domain::types::EmployeeId;
use crate::forms::password::PasswordChangeForm;
use crate::forms::profile::{ChangeOutcome, FieldInput, FieldPath, Section, apply_change};
use crate::forms::FormError;
use crate::repository::{ProfileReader, ProfileWriter};
use crate::services::profile::{
    SAVE_SUCCESS_MESSAGE, fetch_profile, remove_profile_image, submit_profile,
};
use crate::services::{ServiceError, ServiceResult};

pub const ADMIN_ID_MISSING_MESSAGE: &str = "Admin ID is missing. Cannot fetch profile.";
pub const EMPLOYEE_ID_MISSING_MESSAGE: &str = "Employee ID is missing. Cannot fetch profile.";
pub const IMAGE_REMOVED_MESSAGE: &str = "Profile image removed.";

/// Which inputs a panel lets the user change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditPolicy {
    Admin { permanent_address_editable: bool },
    ViewOnly,
}

impl EditPolicy {
    pub fn allows_editing(self) -> bool {
        matches!(self, EditPolicy::Admin { .. })
    }

    pub fn allows(self, path: &FieldPath) -> bool {
        let EditPolicy::Admin {
            permanent_address_editable,
        } = self
        else {
            return false;
        };

        match path {
            FieldPath::Top(key) => key == "contact" || path.is_file_field(),
            FieldPath::Nested(Section::CurrentAddress, _) => true,
            FieldPath::Nested(Section::PermanentAddress, _) => permanent_address_editable,
            FieldPath::Nested(Section::BankDetails, _) => false,
        }
    }

    fn missing_id_message(self) -> &'static str {
        match self {
            EditPolicy::Admin { .. } => ADMIN_ID_MISSING_MESSAGE,
            EditPolicy::ViewOnly => EMPLOYEE_ID_MISSING_MESSAGE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Inline error shown in place of the profile.
    Failed(String),
}

/// Identifies one fetch; only the most recent ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// What happened to a completed fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchApplied {
    Applied,
    /// A newer fetch or identifier change superseded this one.
    Stale,
}

/// Owns the last-fetched snapshot and the editable draft of one profile.
#[derive(Debug)]
pub struct ProfileSettings {
    profile_id: Option<EmployeeId>,
    policy: EditPolicy,
    state: LoadState,
    snapshot: Option<ProfileRecord>,
    draft: Option<ProfileRecord>,
    editing: bool,
    generation: u64,
    notice: Option<String>,
}

impl ProfileSettings {
    /// Blank or absent identifiers are treated as missing.
    pub fn new(profile_id: Option<&str>, policy: EditPolicy) -> Self {
        Self {
            profile_id: profile_id.and_then(|raw| EmployeeId::new(raw).ok()),
            policy,
            state: LoadState::Idle,
            snapshot: None,
            draft: None,
            editing: false,
            generation: 0,
            notice: None,
        }
    }

    pub fn profile_id(&self) -> Option<&EmployeeId> {
        self.profile_id.as_ref()
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<&ProfileRecord> {
        self.snapshot.as_ref()
    }

    pub fn draft(&self) -> Option<&ProfileRecord> {
        self.draft.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Last save or removal outcome, for an alert.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Switches to another profile. Any fetch still in flight becomes stale
    /// and the previous profile's snapshot and draft are dropped.
    pub fn set_profile_id(&mut self, profile_id: Option<&str>) {
        self.profile_id = profile_id.and_then(|raw| EmployeeId::new(raw).ok());
        self.generation += 1;
        self.editing = false;
        self.state = LoadState::Idle;
        self.snapshot = None;
        self.draft = None;
        self.notice = None;
    }

    /// A snapshot fetched for the current identifier is in place.
    fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded && self.snapshot.is_some()
    }

    /// Starts a fetch and hands out the ticket that must accompany its result.
    pub fn begin_load(&mut self) -> ServiceResult<(EmployeeId, FetchTicket)> {
        self.generation += 1;
        let Some(id) = self.profile_id.clone() else {
            log::warn!("Profile fetch skipped: identifier is missing");
            self.state = LoadState::Failed(self.policy.missing_id_message().to_string());
            return Err(ServiceError::MissingIdentifier);
        };
        self.state = LoadState::Loading;
        Ok((
            id,
            FetchTicket {
                generation: self.generation,
            },
        ))
    }

    /// Applies a fetch result unless a newer fetch has started since.
    pub fn complete_load(
        &mut self,
        ticket: FetchTicket,
        result: ServiceResult<ProfileRecord>,
    ) -> ServiceResult<FetchApplied> {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale profile fetch {} (current {})",
                ticket.generation,
                self.generation
            );
            return Ok(FetchApplied::Stale);
        }

        match result {
            Ok(record) => {
                self.draft = Some(record.clone());
                self.snapshot = Some(record);
                self.state = LoadState::Loaded;
                Ok(FetchApplied::Applied)
            }
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetches the profile and replaces both snapshot and draft.
    pub async fn load<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: ProfileReader + ?Sized,
    {
        let (id, ticket) = self.begin_load()?;
        let result = fetch_profile(repo, &id).await;
        self.complete_load(ticket, result)?;
        Ok(())
    }

    pub fn begin_edit(&mut self) -> ServiceResult<()> {
        if !self.policy.allows_editing() {
            return Err(ServiceError::ReadOnly);
        }
        if !self.is_loaded() {
            return Err(ServiceError::NotLoaded);
        }
        self.editing = true;
        Ok(())
    }

    /// Leaves edit mode and throws away unsaved changes.
    pub fn cancel_edit(&mut self) {
        self.draft = self.snapshot.clone();
        self.editing = false;
    }

    pub fn change_field(&mut self, path: &str, input: FieldInput) -> ServiceResult<ChangeOutcome> {
        if !self.editing {
            return Err(ServiceError::NotEditing);
        }
        let path = FieldPath::parse(path)?;
        if !self.policy.allows(&path) {
            return Err(FormError::ReadOnly(path.to_string()).into());
        }
        let draft = self.draft.as_mut().ok_or(ServiceError::NotLoaded)?;
        Ok(apply_change(draft, &path, input)?)
    }

    /// Validates and persists the draft, then refreshes from the backend.
    ///
    /// On failure the panel stays in edit mode with the draft intact. When the
    /// save succeeds but the refresh fails, edit mode is left and the fetch
    /// error is returned.
    pub async fn save<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: ProfileReader + ProfileWriter + ?Sized,
    {
        if !self.editing {
            return Err(ServiceError::NotEditing);
        }
        if !self.is_loaded() {
            return Err(ServiceError::NotLoaded);
        }
        let id = self
            .profile_id
            .clone()
            .ok_or(ServiceError::MissingIdentifier)?;
        let draft = self.draft.as_ref().ok_or(ServiceError::NotLoaded)?;

        if let Err(err) = submit_profile(repo, &id, draft).await {
            self.notice = Some(err.to_string());
            return Err(err);
        }

        log::info!("Profile {id} updated");
        self.notice = Some(SAVE_SUCCESS_MESSAGE.to_string());
        self.editing = false;
        self.load(repo).await
    }

    /// Deletes the stored image once the user has confirmed. Only offered
    /// in edit mode.
    ///
    /// Returns `false` without a request when not confirmed.
    pub async fn remove_image<R>(&mut self, repo: &R, confirmed: bool) -> ServiceResult<bool>
    where
        R: ProfileWriter + ?Sized,
    {
        if !self.policy.allows_editing() {
            return Err(ServiceError::ReadOnly);
        }
        if !self.editing {
            return Err(ServiceError::NotEditing);
        }
        if !confirmed {
            return Ok(false);
        }
        let id = self
            .profile_id
            .clone()
            .ok_or(ServiceError::MissingIdentifier)?;

        match remove_profile_image(repo, &id).await {
            Ok(Some(employee)) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.image = employee.image.clone();
                }
                self.snapshot = Some(employee);
            }
            Ok(None) => {
                for record in [self.snapshot.as_mut(), self.draft.as_mut()]
                    .into_iter()
                    .flatten()
                {
                    record.image = None;
                }
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                return Err(err);
            }
        }

        log::info!("Profile image of {id} removed");
        self.notice = Some(IMAGE_REMOVED_MESSAGE.to_string());
        Ok(true)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    OfficeLocation,
    WeeklyOff,
    UpdateProfile,
    ChangePassword,
}

impl AdminTab {
    pub const ALL: [AdminTab; 4] = [
        AdminTab::OfficeLocation,
        AdminTab::WeeklyOff,
        AdminTab::UpdateProfile,
        AdminTab::ChangePassword,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AdminTab::OfficeLocation => "officeLocation",
            AdminTab::WeeklyOff => "weeklyOff",
            AdminTab::UpdateProfile => "updateProfile",
            AdminTab::ChangePassword => "changePassword",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminTab::OfficeLocation => "Set Office Location",
            AdminTab::WeeklyOff => "Set Weekly Off",
            AdminTab::UpdateProfile => "Update Profile",
            AdminTab::ChangePassword => "Change Password",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmployeeTab {
    Profile,
    #[default]
    Password,
}

impl EmployeeTab {
    pub const ALL: [EmployeeTab; 2] = [EmployeeTab::Profile, EmployeeTab::Password];

    pub fn key(self) -> &'static str {
        match self {
            EmployeeTab::Profile => "profile",
            EmployeeTab::Password => "password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployeeTab::Profile => "Update Profile",
            EmployeeTab::Password => "Change Password",
        }
    }
}

/// Admin settings: office location and weekly-off tabs are owned elsewhere,
/// this panel tracks the selection and drives the profile and password tabs.
#[derive(Debug)]
pub struct AdminSettings {
    pub active_tab: AdminTab,
    pub profile: ProfileSettings,
    pub password: PasswordChangeForm,
}

impl AdminSettings {
    pub fn new(admin_id: Option<&str>, permanent_address_editable: bool) -> Self {
        Self {
            active_tab: AdminTab::default(),
            profile: ProfileSettings::new(
                admin_id,
                EditPolicy::Admin {
                    permanent_address_editable,
                },
            ),
            password: PasswordChangeForm::default(),
        }
    }

    pub fn select_tab(&mut self, tab: AdminTab) {
        self.active_tab = tab;
    }

    /// The profile tab shows a spinner only while its fetch is pending.
    pub fn shows_profile_spinner(&self) -> bool {
        self.active_tab == AdminTab::UpdateProfile
            && *self.profile.load_state() == LoadState::Loading
    }
}

/// Employee settings: a read-only profile and the password form.
#[derive(Debug)]
pub struct EmployeeSettings {
    pub active_tab: EmployeeTab,
    pub profile: ProfileSettings,
    pub password: PasswordChangeForm,
}

impl EmployeeSettings {
    pub fn new(employee_id: Option<&str>) -> Self {
        Self {
            active_tab: EmployeeTab::default(),
            profile: ProfileSettings::new(employee_id, EditPolicy::ViewOnly),
            password: PasswordChangeForm::default(),
        }
    }

    pub fn select_tab(&mut self, tab: EmployeeTab) {
        self.active_tab = tab;
    }
}
