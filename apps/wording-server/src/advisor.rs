//! OpenAI-compatible advisory client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::Advisory;
use tracing::debug;
use wording_engine::advisory::{Advisor, AdvisoryError};

const MAX_TOKENS: u32 = 150;

pub struct OpenAiAdvisor {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiAdvisor {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    async fn advise(&self, term: &str, context: &str) -> Result<Advisory, AdvisoryError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(term, context),
            }],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisoryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Request(format!("advisory service returned {}", status)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AdvisoryError::InvalidResponse("no choices".to_string()))?;

        debug!("Advisory for '{}': {} chars", term, content.len());
        parse_advice(&content)
    }
}

pub fn build_prompt(term: &str, context: &str) -> String {
    format!(
        "The following excerpt contains a forbidden word: '{}'.\n\
         Excerpt:\n\"{}\"\n\n\
         Briefly explain why this is wrong, and give an improved wording.",
        term, context
    )
}

/// First line explains, last line (when there is more than one) rewrites
pub fn parse_advice(content: &str) -> Result<Advisory, AdvisoryError> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let Some(first) = lines.first() else {
        return Err(AdvisoryError::InvalidResponse("empty advice".to_string()));
    };

    let rewrite = if lines.len() > 1 {
        lines[lines.len() - 1].to_string()
    } else {
        String::new()
    };

    Ok(Advisory {
        explanation: first.to_string(),
        rewrite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_first_and_last_line() {
        let advice = parse_advice(
            "'Guarantee' implies certainty.\n\nAlternatives exist.\nWe expect the outcome.\n",
        )
        .unwrap();
        assert_eq!(advice.explanation, "'Guarantee' implies certainty.");
        assert_eq!(advice.rewrite, "We expect the outcome.");
    }

    #[test]
    fn test_single_line_has_no_rewrite() {
        let advice = parse_advice("  Too absolute.  ").unwrap();
        assert_eq!(advice.explanation, "Too absolute.");
        assert_eq!(advice.rewrite, "");
    }

    #[test]
    fn test_empty_advice_is_rejected() {
        assert!(matches!(
            parse_advice(" \n\n "),
            Err(AdvisoryError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_prompt_mentions_term_and_context() {
        let prompt = build_prompt("guarantee", "We guarantee it.");
        assert!(prompt.contains("'guarantee'"));
        assert!(prompt.contains("\"We guarantee it.\""));
    }

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let advisor = OpenAiAdvisor::new(
            "key".to_string(),
            "http://localhost:8080/v1/".to_string(),
            "gpt-4".to_string(),
        )
        .unwrap();
        assert_eq!(advisor.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        let advisor = OpenAiAdvisor::new(
            "key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "gpt-4".to_string(),
        )
        .unwrap();
        let result = advisor.advise("guarantee", "We guarantee it.").await;
        assert!(matches!(result, Err(AdvisoryError::Request(_))));
    }
}
