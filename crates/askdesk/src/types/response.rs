//! Response types for the ask pipeline

use serde::{Deserialize, Serialize};

/// Token usage as reported by a provider, where available
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: Option<u32>,
    /// Tokens in the generated answer
    pub completion_tokens: Option<u32>,
}

impl TokenUsage {
    pub fn new(prompt_tokens: Option<u32>, completion_tokens: Option<u32>) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_tokens.is_none() && self.completion_tokens.is_none()
    }
}

/// Normalized result of one provider call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Generated text
    pub text: String,
    /// Model that produced the text
    pub model: String,
    /// Provider name
    pub provider: String,
    /// Token usage, if the provider reported it
    pub usage: Option<TokenUsage>,
}

/// Response from the ask endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer
    pub answer: String,
    /// Provider that served the request
    pub provider: String,
    /// Model that generated the answer
    pub model: String,
    /// Attempts the dispatcher made (1 means no retries)
    pub attempts: u32,
    /// Chunks produced from the source material
    pub chunks_total: usize,
    /// Chunks that fit within the prompt budget
    pub chunks_used: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Token usage, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl AskResponse {
    /// Build the response from a provider result and pipeline counters
    pub fn new(
        response: ProviderResponse,
        attempts: u32,
        chunks_total: usize,
        chunks_used: usize,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            answer: response.text,
            provider: response.provider,
            model: response.model,
            attempts,
            chunks_total,
            chunks_used,
            processing_time_ms,
            usage: response.usage.filter(|u| !u.is_empty()),
        }
    }
}

/// One tab in the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabInfo {
    /// Wire name used in requests
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// One-line description
    pub description: String,
}

/// Answer style entry in the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Wire name used in requests
    pub name: String,
    /// Human-readable label
    pub label: String,
}

/// Catalog returned by the tabs endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabListResponse {
    /// Available tabs
    pub tabs: Vec<TabInfo>,
    /// Available answer styles
    pub styles: Vec<StyleInfo>,
    /// Smallest accepted detail level
    pub detail_min: u8,
    /// Largest accepted detail level
    pub detail_max: u8,
    /// Detail level used when a request omits one
    pub detail_default: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_usage_is_dropped() {
        let response = ProviderResponse {
            text: "answer".into(),
            model: "llama3.2".into(),
            provider: "ollama".into(),
            usage: Some(TokenUsage::default()),
        };
        let ask = AskResponse::new(response, 1, 4, 2, 87);
        assert!(ask.usage.is_none());
        assert_eq!(ask.attempts, 1);
        assert_eq!(ask.chunks_used, 2);
    }

    #[test]
    fn test_usage_survives_when_reported() {
        let response = ProviderResponse {
            text: "answer".into(),
            model: "gpt-4o-mini".into(),
            provider: "openai".into(),
            usage: Some(TokenUsage::new(Some(120), Some(48))),
        };
        let ask = AskResponse::new(response, 2, 1, 1, 300);
        assert_eq!(ask.usage.unwrap().prompt_tokens, Some(120));
    }
}
