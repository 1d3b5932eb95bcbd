//! Name-keyed registry of configured provider adapters

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ProviderSettings;
use crate::error::{Error, Result};
use crate::providers::{
    AnthropicAdapter, GoogleAdapter, OllamaAdapter, OpenAiAdapter, ProviderAdapter,
};

/// Registered adapters, looked up by wire name
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: BTreeMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from settings. Keyed providers join only when a
    /// key is present; Ollama needs none and is always registered.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        let mut registry = Self::new();

        if settings.openai.api_key.is_some() {
            registry.register(Arc::new(OpenAiAdapter::new(&settings.openai)?));
        }
        if settings.anthropic.api_key.is_some() {
            registry.register(Arc::new(AnthropicAdapter::new(&settings.anthropic)?));
        }
        if settings.google.api_key.is_some() {
            registry.register(Arc::new(GoogleAdapter::new(&settings.google)?));
        }
        registry.register(Arc::new(OllamaAdapter::new(&settings.ollama)?));

        tracing::info!(
            providers = %registry.names().join(", "),
            "provider registry ready"
        );
        Ok(registry)
    }

    /// Register an adapter under its wire name
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Look up an adapter by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn ProviderAdapter>> {
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownProvider {
                name: name.to_string(),
                registered: self.names().join(", "),
            })
    }

    /// Registered wire names, sorted
    pub fn names(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
