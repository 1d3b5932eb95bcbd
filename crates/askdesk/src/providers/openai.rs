//! OpenAI chat completions adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::types::{NeutralPrompt, ProviderResponse, TokenUsage};

use super::ProviderAdapter;

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// OpenAI API client
#[derive(Debug)]
pub struct OpenAiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    // null when the model answered with something other than text
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

impl OpenAiAdapter {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("OpenAI API key missing (set OPENAI_API_KEY)".into()))?;

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
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    fn parse_body(&self, body: &str, requested_model: &str) -> Result<ProviderResponse> {
        let parsed: ChatResponse = serde_json::from_str(body)
            .map_err(|e| Error::invalid_response(self.name(), format!("malformed body: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_response(self.name(), "no choices in response"))?;
        let text = choice
            .message
            .content
            .ok_or_else(|| Error::invalid_response(self.name(), "choice carries no text"))?;

        Ok(ProviderResponse {
            text,
            model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
            provider: self.name().to_string(),
            usage: parsed
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn send(&self, prompt: &NeutralPrompt, model: &str) -> Result<ProviderResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(prompt, model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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
