//! Word-boundary-safe term matching
//!
//! Every dictionary term is compiled once into a case-insensitive regex.
//! Matching is done one category at a time so categories stay independent:
//! a term listed in two categories is reported once per category.

use regex::{Regex, RegexBuilder};

use crate::dictionary::{Dictionary, DictionaryError};

/// One located occurrence of a term in a text unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch<'a> {
    pub term: &'a str,
    pub category: &'a str,
    pub start: usize, // Byte offset into the unit text
    pub end: usize,
}

struct CompiledTerm {
    term: String,
    pattern: Regex,
}

struct CompiledCategory {
    name: String,
    terms: Vec<CompiledTerm>,
}

/// Compiled form of a dictionary
pub struct TermMatcher {
    categories: Vec<CompiledCategory>,
}

impl TermMatcher {
    pub fn new(dictionary: &Dictionary) -> Result<Self, DictionaryError> {
        let mut categories = Vec::with_capacity(dictionary.categories().len());

        for category in dictionary.categories() {
            let mut terms = Vec::with_capacity(category.terms.len());
            for term in &category.terms {
                let pattern = RegexBuilder::new(&term_pattern(term))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| DictionaryError::InvalidTerm {
                        category: category.name.clone(),
                        term: term.clone(),
                        reason: e.to_string(),
                    })?;
                terms.push(CompiledTerm {
                    term: term.clone(),
                    pattern,
                });
            }
            categories.push(CompiledCategory {
                name: category.name.clone(),
                terms,
            });
        }

        Ok(Self { categories })
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Matches of one category's terms, in term order then occurrence order
    pub fn find_in_category<'a>(&'a self, text: &str, category_index: usize) -> Vec<TermMatch<'a>> {
        let Some(category) = self.categories.get(category_index) else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        for compiled in &category.terms {
            for m in compiled.pattern.find_iter(text) {
                matches.push(TermMatch {
                    term: &compiled.term,
                    category: &category.name,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        matches
    }

    /// Matches of every category, in dictionary order
    #[cfg(test)]
    pub fn find_all<'a>(&'a self, text: &str) -> Vec<TermMatch<'a>> {
        (0..self.categories.len())
            .flat_map(|index| self.find_in_category(text, index))
            .collect()
    }
}

/// Regex source for a normalized term
///
/// Tokens are matched literally and separated by any whitespace run.
/// Word boundaries are only required where the term starts or ends with an
/// alphanumeric character.
fn term_pattern(term: &str) -> String {
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let starts_alnum = term.chars().next().is_some_and(char::is_alphanumeric);
    let ends_alnum = term.chars().last().is_some_and(char::is_alphanumeric);

    format!(
        "{}{}{}",
        if starts_alnum { r"\b" } else { "" },
        body,
        if ends_alnum { r"\b" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryConfig;
    use crate::terms;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn matcher_for(categories: &[(&str, &[&str])]) -> (Dictionary, TermMatcher) {
        let json = serde_json::json!({
            "categories": categories
                .iter()
                .map(|(name, terms)| serde_json::json!({"name": name, "terms": terms}))
                .collect::<Vec<_>>()
        });
        let config: DictionaryConfig = serde_json::from_value(json).unwrap();
        let dictionary = Dictionary::from_config(config).unwrap();
        let matcher = TermMatcher::new(&dictionary).unwrap();
        (dictionary, matcher)
    }

    fn terms_found(matcher: &TermMatcher, text: &str) -> Vec<String> {
        matcher
            .find_all(text)
            .into_iter()
            .map(|m| m.term.to_string())
            .collect()
    }

    #[test]
    fn test_matches_standalone_word() {
        let (_, matcher) = matcher_for(&[("Tax", &["tax"])]);
        let matches = matcher.find_all("The tax was high.");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].term, "tax");
        assert_eq!((matches[0].start, matches[0].end), (4, 7));
    }

    #[test]
    fn test_does_not_match_inside_longer_tokens() {
        let (_, matcher) = matcher_for(&[("Tax", &["tax"]), ("Assurance", &["guarantee"])]);

        assert!(matcher.find_all("The taxidermist arrived.").is_empty());
        assert!(matcher.find_all("Our taxonomy is broad.").is_empty());
        assert!(matcher.find_all("Surtax applies.").is_empty());
        assert!(matcher.find_all("We are guaranteeing nothing.").is_empty());
        assert!(matcher.find_all("tax2020 filing").is_empty());
    }

    #[test]
    fn test_punctuation_is_a_boundary() {
        let (_, matcher) = matcher_for(&[("Tax", &["tax"])]);
        assert_eq!(terms_found(&matcher, "(tax)"), vec!["tax"]);
        assert_eq!(terms_found(&matcher, "tax-free income"), vec!["tax"]);
        assert_eq!(terms_found(&matcher, "tax"), vec!["tax"]);
    }

    #[test]
    fn test_case_insensitive() {
        let (_, matcher) = matcher_for(&[("Assurance", &["guarantee"])]);
        assert_eq!(matcher.find_all("WE GUARANTEE IT").len(), 1);
        assert_eq!(matcher.find_all("We Guarantee it").len(), 1);
    }

    #[test]
    fn test_multi_word_phrase_spans_line_breaks() {
        let (_, matcher) = matcher_for(&[("Conclusions", &["in our opinion"])]);

        assert_eq!(matcher.find_all("In our opinion, the controls work.").len(), 1);
        assert_eq!(matcher.find_all("in our\nopinion the controls").len(), 1);
        assert!(matcher.find_all("within our opinionated view").is_empty());
    }

    #[test]
    fn test_reports_every_occurrence_in_order() {
        let (_, matcher) = matcher_for(&[("Tax", &["tax", "levy"])]);
        let text = "A levy and a tax. Another tax.";
        let matches = matcher.find_all(text);

        let found: Vec<_> = matches.iter().map(|m| (m.term, m.start)).collect();
        // Term order first, then occurrence order
        assert_eq!(found, vec![("tax", 13), ("tax", 26), ("levy", 2)]);
    }

    #[test]
    fn test_categories_are_independent() {
        let (_, matcher) = matcher_for(&[("First", &["verify"]), ("Second", &["verify"])]);
        let matches = matcher.find_all("Please verify.");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].category, "First");
        assert_eq!(matches[1].category, "Second");
        assert_eq!(matcher.find_in_category("Please verify.", 1).len(), 1);
        assert!(matcher.find_in_category("Please verify.", 5).is_empty());
    }

    #[test]
    fn test_non_ascii_boundaries() {
        let (_, matcher) = matcher_for(&[("Tax", &["tax"])]);
        assert!(matcher.find_all("taxé").is_empty());
        assert_eq!(matcher.find_all("« tax »").len(), 1);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let (_, matcher) = matcher_for(&[("Odd", &["a.b", "(c)"])]);
        assert!(matcher.find_all("axb").is_empty());
        assert_eq!(matcher.find_all("see a.b here").len(), 1);
        assert_eq!(matcher.find_all("see (c) here").len(), 1);
    }

    #[test]
    fn test_builtin_dictionary_compiles() {
        let dictionary = Dictionary::builtin();
        let matcher = TermMatcher::new(&dictionary).unwrap();
        assert_eq!(matcher.category_count(), dictionary.categories().len());

        let matches = matcher.find_all("We guarantee the tax position.");
        let categories: Vec<_> = matches.iter().map(|m| m.category).collect();
        assert_eq!(categories, vec![terms::ASSURANCE, terms::TAX]);
    }

    proptest! {
        /// Property: a term glued to other letters never matches
        #[test]
        fn embedded_term_never_matches(prefix in "[a-z]{0,6}", suffix in "[a-z]{0,6}") {
            prop_assume!(!prefix.is_empty() || !suffix.is_empty());
            let (_, matcher) = matcher_for(&[("Tax", &["tax"])]);
            let text = format!("{}tax{}", prefix, suffix);
            prop_assert!(matcher.find_all(&text).is_empty());
        }

        /// Property: a standalone term is always found
        #[test]
        fn standalone_term_always_matches(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let (_, matcher) = matcher_for(&[("Tax", &["tax"])]);
            let text = format!("{} tax {}", prefix, suffix);
            prop_assert!(!matcher.find_all(&text).is_empty());
        }
    }
}
