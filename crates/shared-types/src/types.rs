/// Document container formats accepted for scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Docx];

    /// Infer the format from a filename extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A DOCX paragraph as handed over by the decoder
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub is_heading: bool, // Heading-styled paragraph (starts a new section)
}

impl Paragraph {
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_heading: false,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_heading: true,
        }
    }
}

/// Plain text decoded from an uploaded document, in document order
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum DocumentContent {
    Pages(Vec<String>),         // PDF: one entry per page
    Paragraphs(Vec<Paragraph>), // DOCX: paragraphs with heading flags
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Page,    // Real PDF page
    Section, // Heuristically paginated DOCX section
}

/// One addressable chunk of a document that is scanned independently
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextUnit {
    pub kind: UnitKind,
    pub page_number: u32, // 1-based; synthetic for DOCX sections
    pub section: String,  // "Page N" for PDF, heading text for DOCX
    pub text: String,
}

impl TextUnit {
    pub fn page(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Page,
            page_number,
            section: format!("Page {}", page_number),
            text: text.into(),
        }
    }

    pub fn section(page_number: u32, section: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Section,
            page_number,
            section: section.into(),
            text: text.into(),
        }
    }
}

/// Explanation and rewrite returned by the advisory service
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Advisory {
    pub explanation: String,
    pub rewrite: String,
}

/// One located occurrence of a forbidden term
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "word")]
    pub term: String,
    pub category: String,
    pub context: String,
    #[serde(rename = "recommendation")]
    pub suggestion: String,
    /// Category-level reason the term is flagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
    #[serde(skip)]
    pub page_number: u32, // Inherited from the TextUnit
    #[serde(skip)]
    pub section: String, // Inherited from the TextUnit
}

/// All matches found in one TextUnit
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchGroup {
    pub page_number: u32,
    pub section: String,
    pub matches: Vec<MatchRecord>,
}

/// Findings for a whole document, groups in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScanResult {
    pub groups: Vec<MatchGroup>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.groups.iter().flat_map(|g| g.matches.iter())
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut MatchRecord> {
        self.groups.iter_mut().flat_map(|g| g.matches.iter_mut())
    }
}
