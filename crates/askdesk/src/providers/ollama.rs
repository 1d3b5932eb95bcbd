//! Ollama chat adapter for local models

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::types::{NeutralPrompt, ProviderResponse, TokenUsage};

use super::ProviderAdapter;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Ollama API client. Runs against a local daemon, so no credentials.
#[derive(Debug)]
pub struct OllamaAdapter {
    client: Client,
    base_url: String,
    default_model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaAdapter {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            default_model: config.default_model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn build_request(&self, prompt: &NeutralPrompt, model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user_text.clone(),
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: DEFAULT_TEMPERATURE,
            },
        }
    }

    fn parse_body(&self, body: &str, requested_model: &str) -> Result<ProviderResponse> {
        let parsed: ChatResponse = serde_json::from_str(body)
            .map_err(|e| Error::invalid_response(self.name(), format!("malformed body: {}", e)))?;

        let text = parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| Error::invalid_response(self.name(), "no message in response"))?;

        let usage = match (parsed.prompt_eval_count, parsed.eval_count) {
            (None, None) => None,
            (prompt_tokens, completion_tokens) => {
                Some(TokenUsage::new(prompt_tokens, completion_tokens))
            }
        };

        Ok(ProviderResponse {
            text,
            model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
            provider: self.name().to_string(),
            usage,
        })
    }
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn send(&self, prompt: &NeutralPrompt, model: &str) -> Result<ProviderResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let request = self.build_request(prompt, model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| super::classify_transport(self.name(), self.timeout_secs, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| super::classify_transport(self.name(), self.timeout_secs, e))?;

        if !status.is_success() {
            return Err(super::classify_status(self.name(), status, &body));
        }

        self.parse_body(&body, model)
    }
}
