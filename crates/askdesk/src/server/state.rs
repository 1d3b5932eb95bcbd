//! Shared application state

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dispatch::{ModelDispatcher, ProviderRegistry};
use crate::error::Result;
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::prompt::PromptAssembler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Upload loader, capped at the configured size
    loader: DocumentLoader,
    /// Sentence-aware chunker
    chunker: TextChunker,
    /// Prompt packer
    assembler: PromptAssembler,
    /// Registry-backed dispatcher
    dispatcher: ModelDispatcher,
}

impl AppState {
    /// Build state from configuration, registering every provider the
    /// settings allow.
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = ProviderRegistry::from_settings(&config.providers)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Build state around an explicit registry
    pub fn with_registry(config: AppConfig, registry: ProviderRegistry) -> Self {
        let loader = DocumentLoader::new(config.server.max_upload_size);
        let chunker = TextChunker::new(config.chunking.max_chunk_size, config.chunking.overlap);
        let dispatcher = ModelDispatcher::new(registry, config.dispatch.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                loader,
                chunker,
                assembler: PromptAssembler::new(),
                dispatcher,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.inner.loader
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.inner.chunker
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.inner.assembler
    }

    pub fn dispatcher(&self) -> &ModelDispatcher {
        &self.inner.dispatcher
    }
}
