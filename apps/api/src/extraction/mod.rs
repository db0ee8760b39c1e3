//! Document text extraction for uploaded resumes (PDF and DOCX).

mod docx;
mod pdf;

use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to extract text: {0}")]
    ExtractionFailure(String),
}

/// Converts an uploaded document into plain text, trimmed.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
    // Ignore parameters such as `; charset=binary`.
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(PDF_MIME) {
        pdf::extract(bytes)
    } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
        docx::extract(bytes)
    } else {
        Err(ExtractionError::UnsupportedFileType(mime_type.to_string()))
    }
}

/// Maps a file name to a supported MIME type, for clients that send
/// `application/octet-stream` uploads.
pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(PDF_MIME),
        "docx" => Some(DOCX_MIME),
        _ => None,
    }
}
