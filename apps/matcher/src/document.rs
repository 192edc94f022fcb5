//! Document text: loads resume / job description files as normalized text.
//!
//! PDFs go through `pdf-extract`; everything else is read as UTF-8.

use std::path::Path;

use tracing::info;

use crate::errors::DocumentError;

/// Collapses whitespace runs inside each line to one space and drops blank
/// lines, so paragraphs are separated by exactly one newline.
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn load_document(path: &Path) -> Result<String, DocumentError> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let raw = if is_pdf {
        pdf_extract::extract_text(path).map_err(|e| DocumentError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }

    info!(
        "Extracted text from {}. Length: {}",
        path.display(),
        text.len()
    );
    Ok(text)
}
