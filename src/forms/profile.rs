//! Field-level edits on a profile draft and the multipart payload built from it.

use std::fmt::{Display, Formatter};

use serde_json::Value;

use crate::domain::profile::{Address, BankDetails, Document, FileUpload, ProfileRecord};
use crate::domain::types::{CONTACT_DIGITS, ZIP_DIGITS, is_all_digits};
use crate::forms::FormError;

/// Top-level keys holding uploadable documents.
pub const FILE_FIELDS: [&str; 5] = [
    "image",
    "panCardPdf",
    "aadharCardPdf",
    "appointmentLetter",
    "passbookPdf",
];

/// Nested sub-objects of a profile that are edited key by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    CurrentAddress,
    PermanentAddress,
    BankDetails,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::CurrentAddress,
        Section::PermanentAddress,
        Section::BankDetails,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::CurrentAddress => "currentAddress",
            Section::PermanentAddress => "permanentAddress",
            Section::BankDetails => "bankDetails",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == key)
    }

    pub fn is_address(self) -> bool {
        matches!(self, Section::CurrentAddress | Section::PermanentAddress)
    }
}

/// Name of an editable input, either `key` or `section.key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldPath {
    Top(String),
    Nested(Section, String),
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, FormError> {
        let raw = raw.trim();
        match raw.split_once('.') {
            Some((parent, key)) => {
                let section =
                    Section::from_key(parent).ok_or_else(|| FormError::UnknownField(raw.into()))?;
                if key.is_empty() || key.contains('.') {
                    return Err(FormError::UnknownField(raw.into()));
                }
                Ok(FieldPath::Nested(section, key.to_string()))
            }
            None if raw.is_empty() => Err(FormError::UnknownField(raw.into())),
            None => Ok(FieldPath::Top(raw.to_string())),
        }
    }

    pub fn is_file_field(&self) -> bool {
        matches!(self, FieldPath::Top(key) if FILE_FIELDS.contains(&key.as_str()))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPath::Top(key) => write!(f, "{key}"),
            FieldPath::Nested(section, key) => write!(f, "{}.{key}", section.key()),
        }
    }
}

/// Raw value coming from an input control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    File(FileUpload),
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        FieldInput::Text(value.into())
    }
}

/// Whether an edit reached the draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    /// The value failed its input mask; the draft is unchanged.
    Rejected,
}

fn digits_up_to(value: &str, max: u64) -> bool {
    is_all_digits(value) && value.chars().count() as u64 <= max
}

fn letters_and_spaces(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Character-class mask for a path, `None` when the path is unmasked.
fn passes_mask(path: &FieldPath, value: &str) -> Option<bool> {
    match path {
        FieldPath::Top(key) if key == "contact" => Some(digits_up_to(value, CONTACT_DIGITS)),
        FieldPath::Nested(section, key) if section.is_address() => match key.as_str() {
            "street" | "city" | "state" => Some(letters_and_spaces(value)),
            "zip" => Some(digits_up_to(value, ZIP_DIGITS)),
            _ => None,
        },
        _ => None,
    }
}

fn set_address_key(
    address: &mut Address,
    path: &FieldPath,
    key: &str,
    value: String,
) -> Result<(), FormError> {
    let slot = match key {
        "street" => &mut address.street,
        "city" => &mut address.city,
        "state" => &mut address.state,
        "zip" => &mut address.zip,
        _ => return Err(FormError::UnknownField(path.to_string())),
    };
    *slot = Some(value);
    Ok(())
}

fn set_bank_key(
    bank: &mut BankDetails,
    path: &FieldPath,
    key: &str,
    value: String,
) -> Result<(), FormError> {
    let slot = match key {
        "bankName" => &mut bank.bank_name,
        "accountNumber" => &mut bank.account_number,
        "ifsc" => &mut bank.ifsc,
        "passbookPdf" => &mut bank.passbook_pdf,
        _ => return Err(FormError::UnknownField(path.to_string())),
    };
    *slot = Some(value);
    Ok(())
}

fn document_slot<'a>(
    draft: &'a mut ProfileRecord,
    key: &str,
) -> Option<&'a mut Option<Document>> {
    match key {
        "image" => Some(&mut draft.image),
        "panCardPdf" => Some(&mut draft.pan_card_pdf),
        "aadharCardPdf" => Some(&mut draft.aadhar_card_pdf),
        "appointmentLetter" => Some(&mut draft.appointment_letter),
        "passbookPdf" => Some(&mut draft.passbook_pdf),
        _ => None,
    }
}

fn set_top_level_text(
    draft: &mut ProfileRecord,
    path: &FieldPath,
    key: &str,
    value: String,
) -> Result<ChangeOutcome, FormError> {
    let slot = match key {
        "employeeId" => &mut draft.employee_id,
        "name" => &mut draft.name,
        "email" => &mut draft.email,
        "contact" => &mut draft.contact,
        "gender" => &mut draft.gender,
        "maritalStatus" => &mut draft.marital_status,
        "department" => &mut draft.department,
        "designation" => &mut draft.designation,
        "role" => &mut draft.role,
        "dob" => &mut draft.dob,
        "doj" => &mut draft.doj,
        "salary" => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                draft.salary = None;
                return Ok(ChangeOutcome::Applied);
            }
            return Ok(match trimmed.parse::<f64>() {
                Ok(amount) if amount.is_finite() => {
                    draft.salary = Some(amount);
                    ChangeOutcome::Applied
                }
                _ => ChangeOutcome::Rejected,
            });
        }
        _ if Section::from_key(key).is_some() => {
            return Err(FormError::UnknownField(path.to_string()));
        }
        _ => {
            draft.extra.insert(key.to_string(), Value::String(value));
            return Ok(ChangeOutcome::Applied);
        }
    };
    *slot = Some(value);
    Ok(ChangeOutcome::Applied)
}

/// Applies one input event to the draft.
///
/// Masked fields silently reject values outside their character class, the
/// way a keystroke is dropped in the browser. Nested keys are merged into
/// their sub-object leaving sibling keys untouched.
pub fn apply_change(
    draft: &mut ProfileRecord,
    path: &FieldPath,
    input: FieldInput,
) -> Result<ChangeOutcome, FormError> {
    let value = match input {
        FieldInput::File(file) => {
            let FieldPath::Top(key) = path else {
                return Err(FormError::UnexpectedFile(path.to_string()));
            };
            let slot = document_slot(draft, key)
                .ok_or_else(|| FormError::UnexpectedFile(path.to_string()))?;
            *slot = Some(Document::Pending(file));
            return Ok(ChangeOutcome::Applied);
        }
        FieldInput::Text(value) => value,
    };

    if path.is_file_field() {
        return Err(FormError::ExpectedFile(path.to_string()));
    }

    if passes_mask(path, &value) == Some(false) {
        log::debug!("Input for {path} rejected by mask");
        return Ok(ChangeOutcome::Rejected);
    }

    match path {
        FieldPath::Top(key) => set_top_level_text(draft, path, key, value),
        FieldPath::Nested(Section::CurrentAddress, key) => {
            set_address_key(&mut draft.current_address, path, key, value)?;
            Ok(ChangeOutcome::Applied)
        }
        FieldPath::Nested(Section::PermanentAddress, key) => {
            set_address_key(&mut draft.permanent_address, path, key, value)?;
            Ok(ChangeOutcome::Applied)
        }
        FieldPath::Nested(Section::BankDetails, key) => {
            set_bank_key(&mut draft.bank_details, path, key, value)?;
            Ok(ChangeOutcome::Applied)
        }
    }
}

/// One named part of a multipart profile update.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionPart {
    Text(String),
    File(FileUpload),
}

/// Multipart payload for `PUT /employees/{id}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileSubmission {
    parts: Vec<(String, SubmissionPart)>,
}

impl ProfileSubmission {
    pub fn parts(&self) -> &[(String, SubmissionPart)] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<(String, SubmissionPart)> {
        self.parts
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(key, part)| match part {
            SubmissionPart::Text(value) if key == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn file(&self, name: &str) -> Option<&FileUpload> {
        self.parts.iter().find_map(|(key, part)| match part {
            SubmissionPart::File(file) if key == name => Some(file),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(key, _)| key == name)
    }

    fn push_text(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.parts.push((name.to_string(), SubmissionPart::Text(value)));
        }
    }

    fn push_document(&mut self, name: &str, document: Option<&Document>) {
        if let Some(Document::Pending(file)) = document {
            self.parts
                .push((name.to_string(), SubmissionPart::File(file.clone())));
        }
    }
}

/// Text form of a JSON value, or `None` for null.
fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

impl TryFrom<&ProfileRecord> for ProfileSubmission {
    type Error = serde_json::Error;

    /// Builds the payload from a whole draft.
    ///
    /// Documents still pointing at a remote reference are left out so the
    /// backend keeps the stored file.
    fn try_from(draft: &ProfileRecord) -> Result<Self, Self::Error> {
        let mut submission = ProfileSubmission::default();

        submission.push_text("employeeId", draft.employee_id.clone());
        submission.push_text("name", draft.name.clone());
        submission.push_text("email", draft.email.clone());
        submission.push_text("contact", draft.contact.clone());
        submission.push_text("gender", draft.gender.clone());
        submission.push_text("maritalStatus", draft.marital_status.clone());
        submission.push_text("department", draft.department.clone());
        submission.push_text("designation", draft.designation.clone());
        submission.push_text("role", draft.role.clone());
        submission.push_text("salary", draft.salary.map(|salary| salary.to_string()));
        submission.push_text("dob", draft.dob.clone());
        submission.push_text("doj", draft.doj.clone());

        submission.push_text(
            Section::CurrentAddress.key(),
            Some(serde_json::to_string(&draft.current_address)?),
        );
        submission.push_text(
            Section::PermanentAddress.key(),
            Some(serde_json::to_string(&draft.permanent_address)?),
        );
        submission.push_text(
            Section::BankDetails.key(),
            Some(serde_json::to_string(&draft.bank_details)?),
        );

        submission.push_document("image", draft.image.as_ref());
        submission.push_document("panCardPdf", draft.pan_card_pdf.as_ref());
        submission.push_document("aadharCardPdf", draft.aadhar_card_pdf.as_ref());
        submission.push_document("appointmentLetter", draft.appointment_letter.as_ref());
        submission.push_document("passbookPdf", draft.passbook_pdf.as_ref());

        for (key, value) in &draft.extra {
            submission.push_text(key, value_as_text(value));
        }

        Ok(submission)
    }
}
