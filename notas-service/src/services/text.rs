//! Document text extraction. Uploads arrive as raw bytes: PDF payloads go
//! through pdf-extract, anything else is read as plain text. A document
//! that yields no usable text is an extraction miss, not an error; the
//! heuristic fields simply stay null.

use tracing::{info, warn};

/// Minimum number of non-whitespace characters before extracted text is
/// considered usable. Below this the document is treated as scanned or
/// empty.
const MIN_TEXT_CHARS: usize = 10;

pub fn extract_text(bytes: &[u8]) -> Option<String> {
    let text = if bytes.starts_with(b"%PDF") {
        match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "PDF text extraction failed, treating as scanned");
                return None;
            }
        }
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_TEXT_CHARS {
        info!(chars = meaningful, "Extracted text too short to parse");
        None
    } else {
        Some(text)
    }
}
