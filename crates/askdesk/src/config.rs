//! Configuration for the assistant service
//!
//! Loaded once at startup: optional TOML file, then environment overrides.
//! Provider credentials never come from ambient lookups after this point;
//! adapters receive their settings by reference at construction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Per-provider credentials and endpoints
    #[serde(default)]
    pub providers: ProviderSettings,
    /// Retry and timeout policy for provider calls
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("invalid config file '{}': {}", p.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (the only place the environment is read)
    pub fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(host) = std::env::var("ASKDESK_HOST") {
            self.server.host = host;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.providers.openai.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            self.providers.anthropic.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.providers.google.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            self.providers.ollama.base_url = url;
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chunk_size == 0 {
            return Err(Error::Config("max_chunk_size must be positive".into()));
        }
        if self.chunking.overlap >= self.chunking.max_chunk_size {
            return Err(Error::Config(format!(
                "overlap ({}) must be smaller than max_chunk_size ({})",
                self.chunking.overlap, self.chunking.max_chunk_size
            )));
        }
        let providers = [
            ("openai", &self.providers.openai),
            ("anthropic", &self.providers.anthropic),
            ("google", &self.providers.google),
            ("ollama", &self.providers.ollama),
        ];
        for (name, provider) in providers {
            if provider.hard_limit() < provider.context_budget {
                return Err(Error::Config(format!(
                    "hard_limit ({}) for '{}' is below its context_budget ({})",
                    provider.hard_limit(),
                    name,
                    provider.context_budget
                )));
            }
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1200,
            overlap: 0, // exact coverage by default
        }
    }
}

/// Settings for all supported providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "ProviderConfig::openai")]
    pub openai: ProviderConfig,
    #[serde(default = "ProviderConfig::anthropic")]
    pub anthropic: ProviderConfig,
    #[serde(default = "ProviderConfig::google")]
    pub google: ProviderConfig,
    #[serde(default = "ProviderConfig::ollama")]
    pub ollama: ProviderConfig,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai: ProviderConfig::openai(),
            anthropic: ProviderConfig::anthropic(),
            google: ProviderConfig::google(),
            ollama: ProviderConfig::ollama(),
        }
    }
}

impl ProviderSettings {
    /// Settings for a provider by wire name
    pub fn get(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "anthropic" => Some(&self.anthropic),
            "google" => Some(&self.google),
            "ollama" => Some(&self.ollama),
            _ => None,
        }
    }
}

/// Configuration for a single provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (not required for local providers)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the provider's API
    pub base_url: String,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Context budget for assembled prompts, in characters
    pub context_budget: usize,
    /// Absolute prompt-size cap in characters; 4x the budget when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_limit: Option<usize>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn openai() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            context_budget: 48_000,
            hard_limit: None,
            timeout_secs: 120,
        }
    }

    pub fn anthropic() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            default_model: "claude-opus-4-1-20250805".to_string(),
            context_budget: 72_000,
            hard_limit: None,
            timeout_secs: 120,
        }
    }

    pub fn google() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            default_model: "gemini-1.5-flash".to_string(),
            context_budget: 96_000,
            hard_limit: None,
            timeout_secs: 120,
        }
    }

    pub fn ollama() -> Self {
        Self {
            api_key: None,
            base_url: "http://localhost:11434".to_string(),
            default_model: "llama3.2".to_string(),
            context_budget: 24_000,
            hard_limit: None,
            timeout_secs: 300, // local models are slow on CPU
        }
    }

    /// Absolute cap on prompt size. The question alone must fit here,
    /// otherwise assembly fails before any provider call.
    pub fn hard_limit(&self) -> usize {
        self.hard_limit.unwrap_or(self.context_budget * 4)
    }
}

/// Retry and timeout policy for provider calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Retries after the initial attempt (transient failures only)
    pub max_retries: u32,
    /// Time allowance for a single adapter call, in seconds
    pub attempt_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            attempt_timeout_secs: 60,
        }
    }
}
