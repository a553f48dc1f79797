//! DTOs shaped for the profile view.

use serde::Serialize;
use serde_json::Value;

use crate::domain::profile::{Address, Document, ProfileRecord};
use crate::dto::files::{FileKind, file_type};
use crate::dto::labels::format_label;
use crate::models::config::AssetUrls;

const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";

const ADDRESS_KEYS: [&str; 4] = ["street", "city", "state", "zip"];
const LEAVE_KEYS: [&str; 3] = ["casualLeaveBalance", "sickLeaveBalance", "probationMonths"];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileFieldDisplay {
    pub label: String,
    pub value: Option<String>,
}

impl ProfileFieldDisplay {
    fn new(key: &str, value: Option<String>) -> Self {
        Self {
            label: format_label(key),
            value: value.filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileSection {
    pub title: &'static str,
    pub fields: Vec<ProfileFieldDisplay>,
}

/// One document slot with its icon kind and link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentDisplay {
    pub label: String,
    pub kind: Option<FileKind>,
    pub href: Option<String>,
}

/// Everything needed to render the read-only profile card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfilePageData {
    pub name: Option<String>,
    pub image_url: Option<String>,
    /// Name of a picked but unsaved image.
    pub pending_image: Option<String>,
    pub sections: Vec<ProfileSection>,
    pub documents: Vec<DocumentDisplay>,
}

fn extra_text(record: &ProfileRecord, key: &str) -> Option<String> {
    match record.extra.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn address_section(title: &'static str, address: &Address) -> ProfileSection {
    let values = [&address.street, &address.city, &address.state, &address.zip];
    ProfileSection {
        title,
        fields: ADDRESS_KEYS
            .iter()
            .zip(values)
            .map(|(key, value)| ProfileFieldDisplay::new(key, value.clone()))
            .collect(),
    }
}

fn document_display(key: &str, document: Option<&Document>, assets: &AssetUrls) -> DocumentDisplay {
    DocumentDisplay {
        label: format_label(key),
        kind: file_type(document),
        href: document
            .and_then(Document::as_remote)
            .filter(|reference| !reference.is_empty())
            .map(|reference| assets.document_url(reference)),
    }
}

impl ProfilePageData {
    pub fn from_record(record: &ProfileRecord, assets: &AssetUrls) -> Self {
        let display_date = |date: Option<chrono::NaiveDate>| {
            date.map(|d| d.format(DATE_DISPLAY_FORMAT).to_string())
        };

        let personal = ProfileSection {
            title: "Personal Details",
            fields: vec![
                ProfileFieldDisplay::new("employeeId", record.employee_id.clone()),
                ProfileFieldDisplay::new("name", record.name.clone()),
                ProfileFieldDisplay::new("email", record.email.clone()),
                ProfileFieldDisplay::new("contact", record.contact.clone()),
                ProfileFieldDisplay::new("gender", record.gender.clone()),
                ProfileFieldDisplay::new("maritalStatus", record.marital_status.clone()),
                ProfileFieldDisplay::new("department", record.department.clone()),
                ProfileFieldDisplay::new("designation", record.designation.clone()),
                ProfileFieldDisplay::new("role", record.role.clone()),
                ProfileFieldDisplay::new("dob", display_date(record.date_of_birth())),
                ProfileFieldDisplay::new("doj", display_date(record.date_of_joining())),
            ],
        };

        let bank = &record.bank_details;
        let bank_section = ProfileSection {
            title: "Bank Details",
            fields: vec![
                ProfileFieldDisplay::new("bankName", bank.bank_name.clone()),
                ProfileFieldDisplay::new("accountNumber", bank.account_number.clone()),
                ProfileFieldDisplay::new("ifsc", bank.ifsc.clone()),
            ],
        };

        let mut leave_fields: Vec<_> = LEAVE_KEYS
            .iter()
            .map(|key| ProfileFieldDisplay::new(key, extra_text(record, key)))
            .collect();
        leave_fields.insert(
            2,
            ProfileFieldDisplay::new("salary", record.salary.map(|s| s.to_string())),
        );

        // The passbook scan is stored under bank details once uploaded.
        let passbook = bank
            .passbook_pdf
            .clone()
            .map(Document::Remote)
            .or_else(|| record.passbook_pdf.clone());

        let documents = vec![
            document_display("aadharCardPdf", record.aadhar_card_pdf.as_ref(), assets),
            document_display("panCardPdf", record.pan_card_pdf.as_ref(), assets),
            document_display("appointmentLetter", record.appointment_letter.as_ref(), assets),
            document_display("passbookPdf", passbook.as_ref(), assets),
        ];

        let (image_url, pending_image) = match &record.image {
            Some(Document::Remote(reference)) if !reference.is_empty() => {
                (Some(assets.image_url(reference)), None)
            }
            Some(Document::Pending(file)) => (None, Some(file.file_name.clone())),
            _ => (None, None),
        };

        Self {
            name: record.name.clone(),
            image_url,
            pending_image,
            sections: vec![
                personal,
                address_section("Current Address", &record.current_address),
                address_section("Permanent Address", &record.permanent_address),
                bank_section,
                ProfileSection {
                    title: "Leaves & Salary",
                    fields: leave_fields,
                },
            ],
            documents,
        }
    }

    pub fn section(&self, title: &str) -> Option<&ProfileSection> {
        self.sections.iter().find(|section| section.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assets() -> AssetUrls {
        AssetUrls {
            upload_base: "http://localhost:8000/uploads".into(),
            image_base: "http://localhost:8000/image".into(),
            raw_upload_base: "https://res.cloudinary.com/demo/raw/upload".into(),
        }
    }

    fn record() -> ProfileRecord {
        serde_json::from_value(json!({
            "employeeId": "E-7",
            "name": "Asha",
            "maritalStatus": "single",
            "dob": "1990-04-01T00:00:00.000Z",
            "salary": 52000,
            "casualLeaveBalance": 4,
            "currentAddress": { "city": "Pune", "zip": "411001" },
            "bankDetails": { "ifsc": "HDFC0001", "passbookPdf": "v1/passbook" },
            "panCardPdf": "docs/pan.pdf",
            "image": "me.png"
        }))
        .expect("valid profile json")
    }

    fn value<'a>(section: &'a ProfileSection, label: &str) -> Option<&'a str> {
        section
            .fields
            .iter()
            .find(|field| field.label == label)
            .and_then(|field| field.value.as_deref())
    }

    #[test]
    fn personal_section_is_labelled() {
        let page = ProfilePageData::from_record(&record(), &assets());
        let personal = page.section("Personal Details").expect("personal section");

        assert_eq!(value(personal, "Employee Id"), Some("E-7"));
        assert_eq!(value(personal, "Marital Status"), Some("single"));
        assert_eq!(value(personal, "Date Of Birth"), Some("01/04/1990"));
        assert_eq!(value(personal, "Email"), None);
    }

    #[test]
    fn addresses_and_leaves_are_rendered() {
        let page = ProfilePageData::from_record(&record(), &assets());
        let current = page.section("Current Address").expect("address section");
        let leaves = page.section("Leaves & Salary").expect("leave section");

        assert_eq!(value(current, "City"), Some("Pune"));
        assert_eq!(value(current, "Street"), None);
        assert_eq!(value(leaves, "Casual Leave Balance"), Some("4"));
        assert_eq!(value(leaves, "Salary"), Some("52000"));
    }

    #[test]
    fn documents_resolve_against_document_host() {
        let page = ProfilePageData::from_record(&record(), &assets());

        let pan = &page.documents[1];
        assert_eq!(pan.label, "PAN Card");
        assert_eq!(pan.kind, Some(FileKind::Pdf));
        assert_eq!(
            pan.href.as_deref(),
            Some("https://res.cloudinary.com/demo/raw/upload/docs/pan.pdf")
        );

        let passbook = &page.documents[3];
        assert_eq!(passbook.label, "Bank Passbook");
        assert!(passbook.href.is_some());

        assert_eq!(page.documents[0].kind, None);
        assert_eq!(page.documents[0].href, None);
    }

    #[test]
    fn image_resolves_against_image_host() {
        let page = ProfilePageData::from_record(&record(), &assets());

        assert_eq!(page.image_url.as_deref(), Some("http://localhost:8000/image/me.png"));
        assert_eq!(page.pending_image, None);
    }
}
