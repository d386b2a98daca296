//! Text decoding for uploaded report documents
//!
//! - PDF: one string per page, in page order (pdf-extract, lopdf encryption check)
//! - DOCX: paragraphs in body order, flagged when heading-styled (zip + quick-xml)
//!
//! # Feature Flags
//!
//! - `test-fixtures`: Exposes [`fixtures`] for building minimal documents in tests

pub mod docx;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod pdf;

use std::path::Path;

use shared_types::{DocumentContent, DocumentFormat};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("Document is password protected")]
    PasswordProtected,

    #[error("Invalid DOCX: {0}")]
    InvalidDocx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode document bytes into plain text
pub fn extract(format: DocumentFormat, bytes: &[u8]) -> Result<DocumentContent, ExtractError> {
    let content = match format {
        DocumentFormat::Pdf => DocumentContent::Pages(pdf::extract_pages(bytes)?),
        DocumentFormat::Docx => DocumentContent::Paragraphs(docx::extract_paragraphs(bytes)?),
    };

    match &content {
        DocumentContent::Pages(pages) => debug!("Decoded PDF: {} pages", pages.len()),
        DocumentContent::Paragraphs(paragraphs) => {
            debug!("Decoded DOCX: {} paragraphs", paragraphs.len())
        }
    }
    Ok(content)
}

/// Read and decode a document from disk
pub fn extract_file(path: impl AsRef<Path>, format: DocumentFormat) -> Result<DocumentContent, ExtractError> {
    let bytes = std::fs::read(path)?;
    extract(format, &bytes)
}
