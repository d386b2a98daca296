//! Forbidden wording dictionary
//!
//! Maps category names to ordered term sets and resolves rewrite suggestions.
//! A dictionary is built once (from the built-in lists or a JSON file) and
//! then only read, so it can be shared across requests behind an `Arc`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terms;

/// Suggestion used when neither the term nor its category has one
pub const GLOBAL_DEFAULT_SUGGESTION: &str = "Consider rephrasing to avoid this term.";

/// Errors raised while loading or validating a dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Category name must not be empty")]
    EmptyCategoryName,

    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("Category '{0}' has no terms")]
    NoTerms(String),

    #[error("Category '{0}' contains an empty term")]
    EmptyTerm(String),

    #[error("Term '{term}' in category '{category}' cannot be compiled: {reason}")]
    InvalidTerm {
        category: String,
        term: String,
        reason: String,
    },
}

/// A named group of forbidden terms sharing a rewrite policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_suggestion: Option<String>,
    /// Why the category's terms are flagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_explanation: Option<String>,
    /// Per-term suggestions keyed by base form
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub suggestions: BTreeMap<String, String>,
}

/// On-disk dictionary layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    #[serde(default)]
    pub default_suggestion: Option<String>,
    pub categories: Vec<Category>,
}

/// Validated, normalized dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    categories: Vec<Category>,
    default_suggestion: String,
}

impl Dictionary {
    /// Build a dictionary from configuration, normalizing every term
    pub fn from_config(config: DictionaryConfig) -> Result<Self, DictionaryError> {
        let mut seen_names = HashSet::new();
        let mut categories = Vec::with_capacity(config.categories.len());

        for category in config.categories {
            let name = category.name.trim().to_string();
            if name.is_empty() {
                return Err(DictionaryError::EmptyCategoryName);
            }
            if !seen_names.insert(fold_name(&name)) {
                return Err(DictionaryError::DuplicateCategory(name));
            }

            // Ordered set: keep the first occurrence of each term
            let mut seen_terms = HashSet::new();
            let mut terms = Vec::with_capacity(category.terms.len());
            for raw in &category.terms {
                let term = normalize_term(raw);
                if term.is_empty() {
                    return Err(DictionaryError::EmptyTerm(name));
                }
                if seen_terms.insert(term.clone()) {
                    terms.push(term);
                }
            }
            if terms.is_empty() {
                return Err(DictionaryError::NoTerms(name));
            }

            let suggestions = category
                .suggestions
                .into_iter()
                .map(|(term, suggestion)| (normalize_term(&term), suggestion))
                .collect();

            categories.push(Category {
                name,
                terms,
                default_suggestion: category
                    .default_suggestion
                    .filter(|s| !s.trim().is_empty()),
                default_explanation: category
                    .default_explanation
                    .filter(|s| !s.trim().is_empty()),
                suggestions,
            });
        }

        Ok(Self {
            categories,
            default_suggestion: config
                .default_suggestion
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| GLOBAL_DEFAULT_SUGGESTION.to_string()),
        })
    }

    /// Parse a JSON dictionary
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let config: DictionaryConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Load a JSON dictionary from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The built-in English dictionary
    pub fn builtin() -> Self {
        fn category(
            name: &str,
            terms: &[&str],
            default_suggestion: Option<&str>,
            explanation: &str,
            suggestions: &[(&str, &str)],
        ) -> Category {
            Category {
                name: name.to_string(),
                terms: terms.iter().map(|t| t.to_string()).collect(),
                default_suggestion: default_suggestion.map(str::to_string),
                default_explanation: Some(explanation.to_string()),
                suggestions: suggestions
                    .iter()
                    .map(|(t, s)| (t.to_string(), s.to_string()))
                    .collect(),
            }
        }

        Self {
            categories: vec![
                category(
                    terms::ASSURANCE,
                    terms::ASSURANCE_TERMS,
                    Some(terms::ASSURANCE_DEFAULT),
                    terms::ASSURANCE_EXPLANATION,
                    terms::ASSURANCE_SUGGESTIONS,
                ),
                category(
                    terms::CONCLUSIONS,
                    terms::CONCLUSION_TERMS,
                    Some(terms::CONCLUSIONS_DEFAULT),
                    terms::CONCLUSIONS_EXPLANATION,
                    &[],
                ),
                category(
                    terms::NEGATIVE_ASSURANCE,
                    terms::NEGATIVE_ASSURANCE_TERMS,
                    Some(terms::NEGATIVE_ASSURANCE_DEFAULT),
                    terms::NEGATIVE_ASSURANCE_EXPLANATION,
                    &[],
                ),
                category(
                    terms::TECHNICAL,
                    terms::TECHNICAL_TERMS,
                    Some(terms::TECHNICAL_DEFAULT),
                    terms::TECHNICAL_EXPLANATION,
                    &[],
                ),
                category(
                    terms::ABSOLUTES,
                    terms::ABSOLUTE_TERMS,
                    Some(terms::ABSOLUTES_DEFAULT),
                    terms::ABSOLUTES_EXPLANATION,
                    &[],
                ),
                category(
                    terms::TAX,
                    terms::TAX_TERMS,
                    None,
                    terms::TAX_EXPLANATION,
                    terms::TAX_SUGGESTIONS,
                ),
            ],
            default_suggestion: GLOBAL_DEFAULT_SUGGESTION.to_string(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        let name = fold_name(name.trim());
        self.categories.iter().find(|c| fold_name(&c.name) == name)
    }

    /// Ordered term set of a category
    pub fn terms_for(&self, category: &str) -> Option<&[String]> {
        self.category(category).map(|c| c.terms.as_slice())
    }

    pub fn term_count(&self) -> usize {
        self.categories.iter().map(|c| c.terms.len()).sum()
    }

    pub fn default_suggestion(&self) -> &str {
        &self.default_suggestion
    }

    /// Category-level reason a term is flagged, when one is configured
    pub fn explanation_for(&self, category: &str) -> Option<&str> {
        self.category(category)?.default_explanation.as_deref()
    }

    /// Resolve the rewrite suggestion for a term in a category
    ///
    /// Per-term table (by base form, then inflection variants), then the
    /// category default, then the dictionary-wide default.
    pub fn suggestion_for(&self, term: &str, category: &str) -> &str {
        let Some(category) = self.category(category) else {
            return &self.default_suggestion;
        };

        if !category.suggestions.is_empty() {
            for candidate in lookup_candidates(term) {
                if let Some(suggestion) = category.suggestions.get(&candidate) {
                    return suggestion;
                }
            }
        }

        category
            .default_suggestion
            .as_deref()
            .unwrap_or(&self.default_suggestion)
    }
}

/// Case folding shared by duplicate detection and lookup
fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Lowercase, trim and collapse inner whitespace
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip one trailing "s", then one trailing "d", then a trailing "ing"
pub fn base_form(term: &str) -> String {
    let lower = normalize_term(term);
    let mut base = lower.as_str();
    base = base.strip_suffix('s').unwrap_or(base);
    base = base.strip_suffix('d').unwrap_or(base);
    base = base.strip_suffix("ing").unwrap_or(base);
    if base.is_empty() {
        lower
    } else {
        base.to_string()
    }
}

/// Candidate keys for the per-term suggestion table, most specific first
fn lookup_candidates(term: &str) -> Vec<String> {
    let lower = normalize_term(term);
    let mut candidates = vec![base_form(&lower), lower.clone()];

    let rewrites: [(&str, &str); 8] = [
        ("ies", "y"),
        ("ied", "y"),
        ("es", ""),
        ("ed", ""),
        ("ing", "e"),
        ("ing", ""),
        ("s", ""),
        ("d", ""),
    ];
    for (suffix, replacement) in rewrites {
        if let Some(stem) = lower.strip_suffix(suffix) {
            if !stem.is_empty() {
                candidates.push(format!("{}{}", stem, replacement));
            }
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_form_strips_suffixes_in_order() {
        assert_eq!(base_form("guaranteed"), "guarantee");
        assert_eq!(base_form("Guarantees"), "guarantee");
        assert_eq!(base_form("guaranteeing"), "guarantee");
        assert_eq!(base_form("verifying"), "verify");
        assert_eq!(base_form("tax"), "tax");
    }

    #[test]
    fn test_inflections_share_the_base_suggestion() {
        let dictionary = Dictionary::builtin();
        let base = dictionary.suggestion_for("guarantee", terms::ASSURANCE);

        assert_eq!(dictionary.suggestion_for("guaranteed", terms::ASSURANCE), base);
        assert_eq!(dictionary.suggestion_for("GUARANTEES", terms::ASSURANCE), base);
        assert_eq!(dictionary.suggestion_for("guaranteeing", terms::ASSURANCE), base);
        assert!(base.contains("support"));
    }

    #[test]
    fn test_irregular_inflections_reach_the_table() {
        let dictionary = Dictionary::builtin();
        assert_eq!(
            dictionary.suggestion_for("certified", terms::ASSURANCE),
            dictionary.suggestion_for("certify", terms::ASSURANCE)
        );
        assert_eq!(
            dictionary.suggestion_for("confirmed", terms::ASSURANCE),
            dictionary.suggestion_for("confirm", terms::ASSURANCE)
        );
        assert_eq!(
            dictionary.suggestion_for("assuring", terms::ASSURANCE),
            dictionary.suggestion_for("assure", terms::ASSURANCE)
        );
        assert_eq!(
            dictionary.suggestion_for("levies", terms::TAX),
            dictionary.suggestion_for("levy", terms::TAX)
        );
        assert_eq!(
            dictionary.suggestion_for("taxes", terms::TAX),
            dictionary.suggestion_for("tax", terms::TAX)
        );
    }

    #[test]
    fn test_falls_back_to_category_then_global_default() {
        let dictionary = Dictionary::builtin();

        // No per-term entry, category default applies
        assert_eq!(
            dictionary.suggestion_for("ensure", terms::ASSURANCE),
            terms::ASSURANCE_DEFAULT
        );
        // Tax has no category default
        assert_eq!(
            dictionary.suggestion_for("taxation", terms::TAX),
            GLOBAL_DEFAULT_SUGGESTION
        );
        // Unknown category
        assert_eq!(
            dictionary.suggestion_for("anything", "Unknown"),
            GLOBAL_DEFAULT_SUGGESTION
        );
    }

    #[test]
    fn test_terms_for_preserves_order() {
        let dictionary = Dictionary::builtin();
        let terms = dictionary.terms_for("tax document wording").unwrap();
        assert_eq!(terms[0], "tax");
        assert_eq!(terms[1], "taxes");
        assert!(dictionary.terms_for("Missing").is_none());
    }

    #[test]
    fn test_config_normalizes_and_dedupes_terms() {
        let dictionary = Dictionary::from_json_str(
            r#"{
                "categories": [{
                    "name": " Custom ",
                    "terms": ["Foo", "foo", "  Bar   Baz "],
                    "suggestions": {"FOO": "Use qux."}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(
            dictionary.terms_for("Custom").unwrap(),
            &["foo".to_string(), "bar baz".to_string()]
        );
        assert_eq!(dictionary.suggestion_for("Foos", "Custom"), "Use qux.");
        assert_eq!(dictionary.default_suggestion(), GLOBAL_DEFAULT_SUGGESTION);
    }

    #[test]
    fn test_config_rejects_invalid_categories() {
        let duplicate = r#"{"categories": [
            {"name": "A", "terms": ["x"]},
            {"name": "a", "terms": ["y"]}
        ]}"#;
        assert!(matches!(
            Dictionary::from_json_str(duplicate),
            Err(DictionaryError::DuplicateCategory(_))
        ));

        let empty_terms = r#"{"categories": [{"name": "A", "terms": []}]}"#;
        assert!(matches!(
            Dictionary::from_json_str(empty_terms),
            Err(DictionaryError::NoTerms(_))
        ));

        let blank_term = r#"{"categories": [{"name": "A", "terms": ["  "]}]}"#;
        assert!(matches!(
            Dictionary::from_json_str(blank_term),
            Err(DictionaryError::EmptyTerm(_))
        ));

        let blank_name = r#"{"categories": [{"name": "", "terms": ["x"]}]}"#;
        assert!(matches!(
            Dictionary::from_json_str(blank_name),
            Err(DictionaryError::EmptyCategoryName)
        ));

        assert!(matches!(
            Dictionary::from_json_str("not json"),
            Err(DictionaryError::Json(_))
        ));
    }

    #[test]
    fn test_non_ascii_names_fold_the_same_for_duplicates_and_lookup() {
        let duplicate = r#"{"categories": [
            {"name": "Zekerheidstaal Ä", "terms": ["x"]},
            {"name": "zekerheidstaal ä", "terms": ["y"]}
        ]}"#;
        assert!(matches!(
            Dictionary::from_json_str(duplicate),
            Err(DictionaryError::DuplicateCategory(_))
        ));

        let dictionary =
            Dictionary::from_json_str(r#"{"categories": [{"name": "Ärger", "terms": ["x"]}]}"#)
                .unwrap();
        assert!(dictionary.terms_for("ärger").is_some());
        assert!(dictionary.terms_for("ÄRGER").is_some());
    }

    #[test]
    fn test_explanations() {
        let dictionary = Dictionary::builtin();
        for category in dictionary.categories() {
            assert!(
                dictionary.explanation_for(&category.name).is_some(),
                "{} has no explanation",
                category.name
            );
        }
        assert_eq!(
            dictionary.explanation_for(terms::ASSURANCE),
            Some(terms::ASSURANCE_EXPLANATION)
        );
        assert_eq!(dictionary.explanation_for("Unknown"), None);

        let custom = Dictionary::from_json_str(
            r#"{"categories": [
                {"name": "A", "terms": ["x"], "default_explanation": "Too strong."},
                {"name": "B", "terms": ["y"], "default_explanation": "  "}
            ]}"#,
        )
        .unwrap();
        assert_eq!(custom.explanation_for("a"), Some("Too strong."));
        assert_eq!(custom.explanation_for("B"), None);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        std::fs::write(
            &path,
            r#"{"default_suggestion": "Rephrase.", "categories": [{"name": "A", "terms": ["x"]}]}"#,
        )
        .unwrap();

        let dictionary = Dictionary::from_path(&path).unwrap();
        assert_eq!(dictionary.suggestion_for("x", "A"), "Rephrase.");

        assert!(matches!(
            Dictionary::from_path(dir.path().join("missing.json")),
            Err(DictionaryError::Io(_))
        ));
    }
}
