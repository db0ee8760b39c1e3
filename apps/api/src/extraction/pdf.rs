use tracing::warn;

use super::ExtractionError;

/// Layout-aware extraction first, then a plain per-page pass.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    match layout_aware(bytes) {
        Ok(text) => Ok(text),
        Err(layout_err) => {
            warn!("Layout-aware PDF extraction failed: {layout_err}. Trying per-page text...");
            page_text(bytes).map_err(|page_err| {
                ExtractionError::ExtractionFailure(format!(
                    "Both PDF extraction methods failed. Layout-aware error: {layout_err}; \
                     page text error: {page_err}"
                ))
            })
        }
    }
}

fn layout_aware(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed font tables instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked while decoding the document".to_string()),
    }
}

fn page_text(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let document = lopdf::Document::load_mem(bytes)?;
    let mut text = String::new();
    for &page_number in document.get_pages().keys() {
        text.push_str(&document.extract_text(&[page_number])?);
        text.push('\n');
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_methods_failing_reports_both() {
        let err = extract(b"%PDF-1.4 truncated").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Both PDF extraction methods failed"), "{message}");
        assert!(message.contains("page text error"), "{message}");
    }

    #[test]
    fn test_page_text_rejects_non_pdf() {
        assert!(page_text(b"hello").is_err());
    }
}
