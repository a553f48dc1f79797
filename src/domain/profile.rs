//! Employee profile record as exchanged with the backend.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Postal address sub-object. Every key may be missing on the wire.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl Address {
    /// ZIP as typed, empty when absent.
    pub fn zip_str(&self) -> &str {
        self.zip.as_deref().unwrap_or_default()
    }
}

/// Bank account sub-object.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifsc: Option<String>,
    /// Remote reference to the uploaded passbook scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passbook_pdf: Option<String>,
}

/// A file picked locally that has not been sent to the backend yet.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(file_name, mime_type, bytes))
    }
}

impl Debug for FileUpload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A document slot on a profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Document {
    /// Path or URL of a file already stored by the backend.
    Remote(String),
    /// File selected in the current edit session.
    Pending(FileUpload),
}

impl Document {
    pub fn is_pending(&self) -> bool {
        matches!(self, Document::Pending(_))
    }

    pub fn as_remote(&self) -> Option<&str> {
        match self {
            Document::Remote(reference) => Some(reference),
            Document::Pending(_) => None,
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Remote(reference) => serializer.serialize_str(reference),
            Document::Pending(file) => serializer.serialize_str(&file.file_name),
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Document::Remote)
    }
}

/// Employee (or admin) profile as served by `GET /employees/{id}`.
///
/// Keys this crate does not model are kept in `extra` so that a submission
/// carries them back unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "number_or_numeric_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doj: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_address: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permanent_address: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bank_details: BankDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_card_pdf: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhar_card_pdf: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_letter: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passbook_pdf: Option<Document>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Treats an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scalar that older records store either as a JSON string or a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

/// Accepts `"9876543210"` and `9876543210` alike.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(text)) => Some(text),
        Some(Scalar::Number(number)) => Some(number.to_string()),
        None => None,
    })
}

/// Accepts `52000` and `"52000"`; blank or non-numeric text reads as absent.
fn number_or_numeric_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Number(number)) => number.as_f64(),
        Some(Scalar::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Parses the date part of an ISO date or datetime string.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

impl ProfileRecord {
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.dob.as_deref().and_then(parse_date)
    }

    pub fn date_of_joining(&self) -> Option<NaiveDate> {
        self.doj.as_deref().and_then(parse_date)
    }

    /// Contact as typed, empty when absent.
    pub fn contact_str(&self) -> &str {
        self.contact.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_default_when_missing_or_null() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "name": "Asha",
            "currentAddress": null,
        }))
        .unwrap();

        assert_eq!(record.current_address, Address::default());
        assert_eq!(record.permanent_address, Address::default());
        assert_eq!(record.bank_details, BankDetails::default());
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "_id": "abc",
            "casualLeaveBalance": 4,
            "contact": "9876543210",
        }))
        .unwrap();

        assert_eq!(record.extra.get("_id"), Some(&json!("abc")));
        assert_eq!(record.extra.get("casualLeaveBalance"), Some(&json!(4)));
        assert_eq!(record.contact_str(), "9876543210");
    }

    #[test]
    fn numeric_contact_is_read_as_text() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "contact": 9876543210u64,
            "casualLeaveBalance": 2,
        }))
        .unwrap();

        assert_eq!(record.contact_str(), "9876543210");
        assert_eq!(record.extra.get("casualLeaveBalance"), Some(&json!(2)));
    }

    #[test]
    fn salary_accepts_numeric_text() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "salary": "52000",
        }))
        .unwrap();
        assert_eq!(record.salary, Some(52000.0));

        let record: ProfileRecord = serde_json::from_value(json!({
            "salary": 61500.5,
        }))
        .unwrap();
        assert_eq!(record.salary, Some(61500.5));

        let record: ProfileRecord = serde_json::from_value(json!({
            "salary": "to be decided",
            "contact": null,
        }))
        .unwrap();
        assert_eq!(record.salary, None);
        assert_eq!(record.contact, None);
    }

    #[test]
    fn documents_deserialize_as_remote_references() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "image": "avatars/asha.png",
            "panCardPdf": null,
        }))
        .unwrap();

        assert_eq!(
            record.image,
            Some(Document::Remote("avatars/asha.png".to_string()))
        );
        assert_eq!(record.pan_card_pdf, None);
    }

    #[test]
    fn dates_accept_date_and_datetime_forms() {
        let record = ProfileRecord {
            dob: Some("1990-04-12T00:00:00.000Z".to_string()),
            doj: Some("2021-01-04".to_string()),
            ..ProfileRecord::default()
        };

        assert_eq!(
            record.date_of_birth(),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert_eq!(
            record.date_of_joining(),
            NaiveDate::from_ymd_opt(2021, 1, 4)
        );
    }

    #[test]
    fn upload_debug_hides_bytes() {
        let file = FileUpload::new("me.png", "image/png", vec![1, 2, 3]);
        let rendered = format!("{file:?}");
        assert!(rendered.contains("len: 3"));
        assert!(!rendered.contains("[1, 2, 3]"));
    }
}
