//! Splitting decoded documents into scannable text units
//!
//! PDF pages map one-to-one onto units. DOCX has no page metadata, so
//! sections are cut at headings and paginated by word count. Those page
//! numbers are an approximation of the rendered layout, nothing more.

use shared_types::{DocumentContent, Paragraph, TextUnit};

pub const DEFAULT_WORDS_PER_PAGE: usize = 500;
pub const DEFAULT_SECTION: &str = "Introduction";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// A DOCX unit is closed once its word count exceeds this
    pub words_per_page: usize,
    /// Section label used before the first heading
    pub default_section: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            words_per_page: DEFAULT_WORDS_PER_PAGE,
            default_section: DEFAULT_SECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn segment(&self, content: &DocumentContent) -> Vec<TextUnit> {
        match content {
            DocumentContent::Pages(pages) => self.segment_pages(pages),
            DocumentContent::Paragraphs(paragraphs) => self.segment_paragraphs(paragraphs),
        }
    }

    /// One unit per non-blank page, numbered by page index
    pub fn segment_pages(&self, pages: &[String]) -> Vec<TextUnit> {
        pages
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| TextUnit::page(index as u32 + 1, text.as_str()))
            .collect()
    }

    /// Heading-tagged sections with word-count pagination
    pub fn segment_paragraphs(&self, paragraphs: &[Paragraph]) -> Vec<TextUnit> {
        let mut builder = SectionBuilder::new(&self.config);

        for paragraph in paragraphs {
            let text = paragraph.text.trim();
            if text.is_empty() {
                continue;
            }

            if paragraph.is_heading {
                builder.flush();
                builder.section = text.to_string();
                continue;
            }

            builder.push(text);
            if builder.word_count > self.config.words_per_page {
                builder.flush();
            }
        }

        builder.flush();
        builder.units
    }
}

struct SectionBuilder {
    section: String,
    buffer: String,
    word_count: usize,
    next_page: u32,
    units: Vec<TextUnit>,
}

impl SectionBuilder {
    fn new(config: &SegmenterConfig) -> Self {
        Self {
            section: config.default_section.clone(),
            buffer: String::new(),
            word_count: 0,
            next_page: 1,
            units: Vec::new(),
        }
    }

    fn push(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
        self.word_count += text.split_whitespace().count();
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        self.units
            .push(TextUnit::section(self.next_page, self.section.clone(), text));
        self.next_page += 1;
        self.word_count = 0;
    }
}
