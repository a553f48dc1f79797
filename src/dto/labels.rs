//! Human-readable labels for profile keys.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z])").expect("capital regex is valid"));
static LOWER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([0-9])").expect("lower-digit regex is valid"));
static ACRONYM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("acronym regex is valid"));
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("word start regex is valid"));

/// Keys whose label cannot be derived from their spelling.
const LABEL_OVERRIDES: [(&str, &str); 11] = [
    ("dob", "Date Of Birth"),
    ("doj", "Date Of Joining"),
    ("empId", "Employee ID"),
    ("aadharCardPdf", "Aadhar Card"),
    ("panCardPdf", "PAN Card"),
    ("passbookPdf", "Bank Passbook"),
    ("appointmentLetter", "Appointment Letter"),
    ("casualLeaveBalance", "Casual Leave Balance"),
    ("sickLeaveBalance", "Sick Leave Balance"),
    ("probationMonths", "Probation Period"),
    ("ifsc", "IFSC"),
];

/// Turns a camelCase key into a title-cased label, e.g. `maritalStatus` into
/// `Marital Status`.
pub fn format_label(key: &str) -> String {
    if let Some((_, label)) = LABEL_OVERRIDES.iter().find(|(name, _)| *name == key) {
        return (*label).to_string();
    }

    let spaced = CAPITAL.replace_all(key, " $1");
    let spaced = LOWER_DIGIT.replace_all(&spaced, "$1 $2");
    let spaced = ACRONYM_RUN.replace_all(&spaced, "$1 $2");
    WORD_START
        .replace_all(spaced.trim(), |caps: &Captures| caps[0].to_uppercase())
        .into_owned()
}
