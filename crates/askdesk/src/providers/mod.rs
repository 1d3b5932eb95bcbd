//! Provider adapters
//!
//! One adapter per upstream model API. Each adapter turns a
//! [`NeutralPrompt`] into the provider's wire schema, sends a single
//! request, and normalizes the reply into a [`ProviderResponse`]. Adapters
//! never retry; they classify failures so the dispatcher can tell
//! transient errors from terminal ones.

mod anthropic;
mod google;
mod ollama;
mod openai;

pub use anthropic::AnthropicAdapter;
pub use google::GoogleAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::{NeutralPrompt, ProviderResponse};

/// A single-shot client for one model API
#[async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Wire name, as used in requests and the registry
    fn name(&self) -> &'static str;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Send one prompt and normalize the reply
    async fn send(&self, prompt: &NeutralPrompt, model: &str) -> Result<ProviderResponse>;
}

/// Map an HTTP error status to the error taxonomy. Auth failures are
/// terminal; rate limits and server errors are transient.
pub(crate) fn classify_status(provider: &str, status: reqwest::StatusCode, body: &str) -> Error {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => Error::auth(provider, message),
        429 => Error::rate_limit(provider, message),
        500..=599 => Error::unavailable(provider, format!("HTTP {}: {}", status.as_u16(), message)),
        code => Error::bad_request(format!(
            "provider '{}' rejected the request (HTTP {}): {}",
            provider, code, message
        )),
    }
}

/// Map a transport failure. Timeouts keep the configured allowance so the
/// error message states what was exceeded.
pub(crate) fn classify_transport(provider: &str, timeout_secs: u64, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            provider: provider.to_string(),
            seconds: timeout_secs,
        }
    } else {
        Error::unavailable(provider, e.to_string())
    }
}

/// Pull a human-readable message out of a provider error body. Covers the
/// nested `{"error": {"message": ...}}` shape and Ollama's flat
/// `{"error": "..."}`; anything else comes back truncated as-is.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value["error"]["message"].as_str() {
            return message.to_string();
        }
        if let Some(message) = value["error"].as_str() {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no error detail".to_string();
    }
    trimmed.chars().take(200).collect()
}
