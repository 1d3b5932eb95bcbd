//! Anthropic messages API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::types::{NeutralPrompt, ProviderResponse, TokenUsage};

use super::ProviderAdapter;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic API client
#[derive(Debug)]
pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<WireMessage>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesUsage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

impl AnthropicAdapter {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            Error::Config("Anthropic API key missing (set ANTHROPIC_API_KEY)".into())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            default_model: config.default_model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Ok(key) = self.api_key.parse() {
            headers.insert("x-api-key", key);
        }
        if let Ok(version) = ANTHROPIC_VERSION.parse() {
            headers.insert("anthropic-version", version);
        }
        headers
    }

    fn build_request(&self, prompt: &NeutralPrompt, model: &str) -> MessagesRequest {
        MessagesRequest {
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system: prompt.system.clone(),
            messages: vec![WireMessage {
                role: "user",
                content: prompt.user_text.clone(),
            }],
        }
    }

    fn parse_body(&self, body: &str, requested_model: &str) -> Result<ProviderResponse> {
        let parsed: MessagesResponse = serde_json::from_str(body)
            .map_err(|e| Error::invalid_response(self.name(), format!("malformed body: {}", e)))?;

        let text = parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| Error::invalid_response(self.name(), "no text block in content"))?;

        Ok(ProviderResponse {
            text,
            model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
            provider: self.name().to_string(),
            usage: parsed
                .usage
                .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens)),
        })
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn send(&self, prompt: &NeutralPrompt, model: &str) -> Result<ProviderResponse> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = self.build_request(prompt, model);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
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
