//! PDF page text via pdf-extract, with an lopdf encryption check in front

use std::panic;

use lopdf::Document;
use tracing::warn;

use crate::ExtractError;

/// Text of every page, in page order; blank pages yield empty strings
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        let message = e.to_string();
        if is_encryption_error(&message) {
            ExtractError::PasswordProtected
        } else {
            ExtractError::InvalidPdf(message)
        }
    })?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(ExtractError::PasswordProtected);
    }

    // pdf-extract panics on some malformed fonts
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| {
            warn!("PDF text extraction panicked");
            ExtractError::InvalidPdf("unsupported font or content encoding".to_string())
        })?
        .map_err(|e| {
            let message = e.to_string();
            if is_encryption_error(&message) {
                ExtractError::PasswordProtected
            } else {
                ExtractError::InvalidPdf(message)
            }
        })?;

    Ok(pages.iter().map(|page| normalize_page(page)).collect())
}

fn is_encryption_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("encrypt") || lower.contains("decrypt") || lower.contains("password")
}

/// Trim every line and drop the blank ones pdf-extract emits for vertical gaps
fn normalize_page(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
