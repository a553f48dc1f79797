//! File classification and link resolution for profile documents.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::profile::{Document, FileUpload};
use crate::models::config::AssetUrls;

pub const NOT_UPLOADED: &str = "Not uploaded";

static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.(jpg|jpeg|png|gif|webp)$").expect("image extension regex is valid")
});

/// Marker to decide which icon a document gets.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
    Other,
}

fn pending_kind(file: &FileUpload) -> FileKind {
    let mime = file.mime_type.to_lowercase();
    let name = file.file_name.to_lowercase();

    if mime == "application/pdf" || name.ends_with(".pdf") {
        FileKind::Pdf
    } else if mime.starts_with("image/") {
        FileKind::Image
    } else {
        FileKind::Other
    }
}

fn remote_kind(reference: &str) -> FileKind {
    let clean = reference.to_lowercase();

    // Raw uploads on the document host are PDFs stored without extension.
    if clean.contains("/raw/upload/") || clean.ends_with(".pdf") {
        FileKind::Pdf
    } else if IMAGE_EXTENSION.is_match(&clean) {
        FileKind::Image
    } else {
        FileKind::Other
    }
}

/// Classifies a document slot. Empty slots have no kind.
pub fn file_type(document: Option<&Document>) -> Option<FileKind> {
    match document? {
        Document::Pending(file) => Some(pending_kind(file)),
        Document::Remote(reference) if reference.is_empty() => None,
        Document::Remote(reference) => Some(remote_kind(reference)),
    }
}

fn join(base: &str, reference: &str) -> String {
    if reference.starts_with("http") {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

impl AssetUrls {
    /// Where a stored profile image is served from.
    pub fn image_url(&self, reference: &str) -> String {
        join(&self.image_base, reference)
    }

    /// Where an uploaded document (PDF or scan) is served from.
    pub fn document_url(&self, reference: &str) -> String {
        join(&self.raw_upload_base, reference)
    }

    pub fn upload_url(&self, reference: &str) -> String {
        join(&self.upload_base, reference)
    }
}

/// Text for a document slot: "Not uploaded", the picked file's name, or a
/// link into the uploads folder.
pub fn render_file_link(document: Option<&Document>, assets: &AssetUrls) -> String {
    match document {
        None => NOT_UPLOADED.to_string(),
        Some(Document::Remote(reference)) if reference.is_empty() => NOT_UPLOADED.to_string(),
        Some(Document::Pending(file)) => file.file_name.clone(),
        Some(Document::Remote(reference)) => assets.upload_url(reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> AssetUrls {
        AssetUrls {
            upload_base: "http://localhost:8000/uploads/".into(),
            image_base: "http://localhost:8000/image".into(),
            raw_upload_base: "https://res.cloudinary.com/demo/raw/upload/".into(),
        }
    }

    fn remote(reference: &str) -> Document {
        Document::Remote(reference.into())
    }

    #[test]
    fn remote_references_are_classified_case_insensitively() {
        assert_eq!(file_type(Some(&remote("photo.JPG"))), Some(FileKind::Image));
        assert_eq!(file_type(Some(&remote("scan.Pdf"))), Some(FileKind::Pdf));
        assert_eq!(file_type(Some(&remote("notes.txt"))), Some(FileKind::Other));
    }

    #[test]
    fn raw_upload_references_are_pdfs() {
        let doc = remote("https://res.cloudinary.com/demo/raw/upload/v1/abc");

        assert_eq!(file_type(Some(&doc)), Some(FileKind::Pdf));
    }

    #[test]
    fn empty_slots_have_no_kind() {
        assert_eq!(file_type(None), None);
        assert_eq!(file_type(Some(&remote(""))), None);
    }

    #[test]
    fn pending_files_use_mime_then_name() {
        let pdf_by_name = Document::Pending(FileUpload::new("a.PDF", "", vec![]));
        let image = Document::Pending(FileUpload::new("a.bin", "image/webp", vec![]));
        let other = Document::Pending(FileUpload::new("a.doc", "application/msword", vec![]));

        assert_eq!(file_type(Some(&pdf_by_name)), Some(FileKind::Pdf));
        assert_eq!(file_type(Some(&image)), Some(FileKind::Image));
        assert_eq!(file_type(Some(&other)), Some(FileKind::Other));
    }

    #[test]
    fn absolute_references_pass_through() {
        let assets = assets();

        assert_eq!(
            assets.image_url("https://cdn.example.com/me.png"),
            "https://cdn.example.com/me.png"
        );
        assert_eq!(assets.image_url("me.png"), "http://localhost:8000/image/me.png");
        assert_eq!(
            assets.document_url("pan.pdf"),
            "https://res.cloudinary.com/demo/raw/upload/pan.pdf"
        );
    }

    #[test]
    fn file_links_describe_each_slot() {
        let assets = assets();
        let pending = Document::Pending(FileUpload::new("pan.pdf", "application/pdf", vec![1]));

        assert_eq!(render_file_link(None, &assets), NOT_UPLOADED);
        assert_eq!(render_file_link(Some(&pending), &assets), "pan.pdf");
        assert_eq!(
            render_file_link(Some(&remote("pan.pdf")), &assets),
            "http://localhost:8000/uploads/pan.pdf"
        );
    }
}
