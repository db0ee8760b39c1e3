use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";
const FALLBACK: &[u8] = b"mc:Fallback";

/// Joins the text of every `w:p` paragraph in the main document part with newlines.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::ExtractionFailure(format!("Invalid DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::ExtractionFailure(format!("Missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::ExtractionFailure(format!("Unreadable {DOCUMENT_PART}: {e}")))?;

    let paragraphs = paragraphs(&xml)
        .map_err(|e| ExtractionError::ExtractionFailure(format!("Malformed {DOCUMENT_PART}: {e}")))?;

    Ok(paragraphs.join("\n").trim().to_string())
}

/// Paragraphs nested inside another (text boxes) are emitted as their own lines
/// without interrupting the enclosing paragraph. `mc:Fallback` subtrees repeat the
/// text of their `mc:Choice` sibling and are skipped.
fn paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut enclosing: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == FALLBACK => fallback_depth += 1,
            Event::End(e) if e.name().as_ref() == FALLBACK => {
                fallback_depth = fallback_depth.saturating_sub(1)
            }
            _ if fallback_depth > 0 => {}
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => enclosing.push(std::mem::take(&mut current)),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    let finished = std::mem::replace(&mut current, enclosing.pop().unwrap_or_default());
                    paragraphs.push(finished);
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            _ => {}
        }
    }

    Ok(paragraphs)
}
