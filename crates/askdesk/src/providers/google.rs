//! Google Gemini generateContent adapter

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
const DEFAULT_TOP_P: f32 = 0.95;

/// Google Gemini API client
#[derive(Debug)]
pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GoogleAdapter {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("Google API key missing (set GOOGLE_API_KEY)".into()))?;

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

    // The key travels in the query string, so this URL must stay out of logs
    fn request_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn build_request(&self, prompt: &NeutralPrompt) -> GenerateRequest {
        GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart {
                    text: prompt.user_text.clone(),
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: prompt.system.clone(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_TOKENS,
                top_p: DEFAULT_TOP_P,
            },
        }
    }

    fn parse_body(&self, body: &str, requested_model: &str) -> Result<ProviderResponse> {
        let parsed: GenerateResponse = serde_json::from_str(body)
            .map_err(|e| Error::invalid_response(self.name(), format!("malformed body: {}", e)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_response(self.name(), "no candidates in response"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(Error::invalid_response(self.name(), "candidate carries no text"));
        }

        Ok(ProviderResponse {
            text,
            model: parsed
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            provider: self.name().to_string(),
            usage: parsed
                .usage_metadata
                .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count)),
        })
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn name(&self) -> &'static str {
        "google"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn send(&self, prompt: &NeutralPrompt, model: &str) -> Result<ProviderResponse> {
        let url = self.request_url(model);
        let request = self.build_request(prompt);

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
