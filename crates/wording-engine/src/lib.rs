//! Forbidden wording detection for report documents
//!
//! The engine turns decoded document text into grouped findings:
//!
//! 1. [`segmenter`] splits the document into pages or heading sections
//! 2. [`matcher`] locates dictionary terms on word boundaries, per category
//! 3. [`context`] cuts a display snippet around each occurrence
//! 4. [`dictionary`] supplies the rewrite suggestion and explanation
//!
//! # Feature Flags
//!
//! - `server` (default): Enables [`advisory`] enrichment (requires tokio)

#[cfg(feature = "server")]
pub mod advisory;
pub mod context;
pub mod dictionary;
pub mod matcher;
pub mod segmenter;
pub mod terms;

use std::sync::Arc;

use shared_types::{DocumentContent, MatchGroup, MatchRecord, ScanResult, TextUnit};
use tracing::debug;

pub use dictionary::{Category, Dictionary, DictionaryConfig, DictionaryError};
pub use matcher::{TermMatch, TermMatcher};
pub use segmenter::{Segmenter, SegmenterConfig};

/// WordingEngine entry point
pub struct WordingEngine {
    dictionary: Arc<Dictionary>,
    matcher: TermMatcher,
    segmenter: Segmenter,
}

impl WordingEngine {
    /// Compile the dictionary; fails only on terms that cannot form a regex
    pub fn new(dictionary: Arc<Dictionary>) -> Result<Self, DictionaryError> {
        let matcher = TermMatcher::new(&dictionary)?;
        Ok(Self {
            dictionary,
            matcher,
            segmenter: Segmenter::default(),
        })
    }

    /// Engine over the built-in English dictionary
    pub fn builtin() -> Result<Self, DictionaryError> {
        Self::new(Arc::new(Dictionary::builtin()))
    }

    pub fn with_segmenter(mut self, config: SegmenterConfig) -> Self {
        self.segmenter = Segmenter::new(config);
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn segment(&self, content: &DocumentContent) -> Vec<TextUnit> {
        self.segmenter.segment(content)
    }

    /// Segment and scan a decoded document
    pub fn scan_document(&self, content: &DocumentContent) -> ScanResult {
        let units = self.segment(content);
        self.scan(&units)
    }

    /// Scan units in order; units without matches are left out
    pub fn scan(&self, units: &[TextUnit]) -> ScanResult {
        let groups: Vec<MatchGroup> = units
            .iter()
            .filter_map(|unit| {
                let matches = self.scan_unit(unit);
                if matches.is_empty() {
                    None
                } else {
                    Some(MatchGroup {
                        page_number: unit.page_number,
                        section: unit.section.clone(),
                        matches,
                    })
                }
            })
            .collect();

        let result = ScanResult { groups };
        debug!(
            "Scanned {} units: {} groups, {} matches",
            units.len(),
            result.groups.len(),
            result.match_count()
        );
        result
    }

    /// Every occurrence in one unit, category by category
    pub fn scan_unit(&self, unit: &TextUnit) -> Vec<MatchRecord> {
        let mut records = Vec::new();

        for category_index in 0..self.matcher.category_count() {
            for m in self.matcher.find_in_category(&unit.text, category_index) {
                records.push(MatchRecord {
                    term: m.term.to_string(),
                    category: m.category.to_string(),
                    context: context::extract_context(&unit.text, m.start, m.end),
                    suggestion: self.dictionary.suggestion_for(m.term, m.category).to_string(),
                    explanation: self.dictionary.explanation_for(m.category).map(str::to_string),
                    advisory: None,
                    page_number: unit.page_number,
                    section: unit.section.clone(),
                });
            }
        }

        records
    }
}
