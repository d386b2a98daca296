//! Optional advisory enrichment of scan findings
//!
//! An [`Advisor`] explains why a flagged term is problematic and proposes a
//! rewrite of its context. Enrichment never fails a scan: errors and
//! timeouts leave the record without an advisory, and the whole step stops
//! at a deadline.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use shared_types::{Advisory, ScanResult};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ADVISORY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("Advisory request failed: {0}")]
    Request(String),

    #[error("Advisory response was not usable: {0}")]
    InvalidResponse(String),

    #[error("Advisory request timed out after {0}ms")]
    Timeout(u64),
}

/// Source of explanations and rewrites for flagged terms
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, term: &str, context: &str) -> Result<Advisory, AdvisoryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryOptions {
    /// Upper bound for a single advisor call
    pub timeout: Duration,
    pub max_concurrency: usize,
    /// Upper bound for the whole enrichment step
    pub total_timeout: Duration,
}

impl Default for AdvisoryOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ADVISORY_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            total_timeout: DEFAULT_TOTAL_TIMEOUT,
        }
    }
}

/// Attach advisories to every record of a scan result
///
/// Each record is sent to the advisor at most once. Returns the number of
/// records that received an advisory.
pub async fn enrich(
    result: &mut ScanResult,
    advisor: &dyn Advisor,
    options: &AdvisoryOptions,
) -> usize {
    let requests: Vec<(String, String)> = result
        .records()
        .map(|r| (r.term.clone(), r.context.clone()))
        .collect();
    if requests.is_empty() {
        return 0;
    }

    let timeout = options.timeout;
    let deadline = tokio::time::Instant::now() + options.total_timeout;
    let mut advisories: Vec<Option<Advisory>> = requests.iter().map(|_| None).collect();

    let mut pending = stream::iter(requests.into_iter().enumerate())
        .map(|(index, (term, context))| async move {
            (index, advise_one(advisor, &term, &context, timeout).await)
        })
        .buffer_unordered(options.max_concurrency.max(1));

    loop {
        match tokio::time::timeout_at(deadline, pending.next()).await {
            Ok(Some((index, advisory))) => advisories[index] = advisory,
            Ok(None) => break,
            Err(_) => {
                warn!(
                    "Advisory enrichment stopped after {}ms",
                    options.total_timeout.as_millis()
                );
                break;
            }
        }
    }

    let mut enriched = 0;
    for (record, advisory) in result.records_mut().zip(advisories) {
        if advisory.is_some() {
            enriched += 1;
        }
        record.advisory = advisory;
    }

    debug!("Advisory enrichment: {} records enriched", enriched);
    enriched
}

async fn advise_one(
    advisor: &dyn Advisor,
    term: &str,
    context: &str,
    timeout: Duration,
) -> Option<Advisory> {
    let outcome = match tokio::time::timeout(timeout, advisor.advise(term, context)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(AdvisoryError::Timeout(timeout.as_millis() as u64)),
    };

    match outcome {
        Ok(advisory) => Some(advisory),
        Err(e) => {
            warn!("Advisory for '{}' skipped: {}", term, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{MatchGroup, MatchRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(term: &str, context: &str) -> MatchRecord {
        MatchRecord {
            term: term.to_string(),
            category: "Test".to_string(),
            context: context.to_string(),
            suggestion: "Rephrase.".to_string(),
            explanation: None,
            advisory: None,
            page_number: 1,
            section: "Page 1".to_string(),
        }
    }

    fn sample_result() -> ScanResult {
        ScanResult {
            groups: vec![
                MatchGroup {
                    page_number: 1,
                    section: "Page 1".to_string(),
                    matches: vec![record("guarantee", "We guarantee it."), record("tax", "The tax.")],
                },
                MatchGroup {
                    page_number: 3,
                    section: "Page 3".to_string(),
                    matches: vec![record("always", "It always works.")],
                },
            ],
        }
    }

    struct EchoAdvisor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Advisor for EchoAdvisor {
        async fn advise(&self, term: &str, context: &str) -> Result<Advisory, AdvisoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Advisory {
                explanation: format!("'{}' overstates certainty", term),
                rewrite: context.to_uppercase(),
            })
        }
    }

    /// Fails on one term, hangs on another
    struct FlakyAdvisor;

    #[async_trait]
    impl Advisor for FlakyAdvisor {
        async fn advise(&self, term: &str, _context: &str) -> Result<Advisory, AdvisoryError> {
            match term {
                "tax" => Err(AdvisoryError::Request("connection refused".to_string())),
                "always" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Err(AdvisoryError::InvalidResponse("unreachable".to_string()))
                }
                _ => Ok(Advisory {
                    explanation: "ok".to_string(),
                    rewrite: "ok".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_attaches_advisories_in_record_order() {
        let mut result = sample_result();
        let advisor = EchoAdvisor {
            calls: AtomicUsize::new(0),
        };

        let enriched = enrich(&mut result, &advisor, &AdvisoryOptions::default()).await;

        assert_eq!(enriched, 3);
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 3);
        let rewrites: Vec<_> = result
            .records()
            .map(|r| r.advisory.as_ref().unwrap().rewrite.clone())
            .collect();
        assert_eq!(rewrites, vec!["WE GUARANTEE IT.", "THE TAX.", "IT ALWAYS WORKS."]);
    }

    #[tokio::test]
    async fn test_failures_and_timeouts_leave_records_untouched() {
        let mut result = sample_result();
        let options = AdvisoryOptions {
            timeout: Duration::from_millis(50),
            max_concurrency: 2,
            ..AdvisoryOptions::default()
        };

        let enriched = enrich(&mut result, &FlakyAdvisor, &options).await;

        assert_eq!(enriched, 1);
        let flags: Vec<_> = result.records().map(|r| r.advisory.is_some()).collect();
        assert_eq!(flags, vec![true, false, false]);
        // Base fields survive enrichment failures
        assert_eq!(result.groups[1].matches[0].context, "It always works.");
    }

    /// Hangs on every term except "guarantee"
    struct StallingAdvisor;

    #[async_trait]
    impl Advisor for StallingAdvisor {
        async fn advise(&self, term: &str, _context: &str) -> Result<Advisory, AdvisoryError> {
            if term != "guarantee" {
                tokio::time::sleep(Duration::from_secs(600)).await;
            }
            Ok(Advisory {
                explanation: "ok".to_string(),
                rewrite: "ok".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_total_timeout_bounds_enrichment() {
        let mut result = sample_result();
        let options = AdvisoryOptions {
            timeout: Duration::from_secs(600),
            max_concurrency: 1,
            total_timeout: Duration::from_millis(200),
        };

        let started = std::time::Instant::now();
        let enriched = enrich(&mut result, &StallingAdvisor, &options).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(enriched, 1);
        let flags: Vec<_> = result.records().map(|r| r.advisory.is_some()).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[tokio::test]
    async fn test_empty_result_makes_no_calls() {
        let mut result = ScanResult::default();
        let advisor = EchoAdvisor {
            calls: AtomicUsize::new(0),
        };

        let enriched = enrich(&mut result, &advisor, &AdvisoryOptions::default()).await;

        assert_eq!(enriched, 0);
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_treated_as_one() {
        let mut result = sample_result();
        let advisor = EchoAdvisor {
            calls: AtomicUsize::new(0),
        };
        let options = AdvisoryOptions {
            max_concurrency: 0,
            ..AdvisoryOptions::default()
        };

        assert_eq!(enrich(&mut result, &advisor, &options).await, 3);
    }
}
