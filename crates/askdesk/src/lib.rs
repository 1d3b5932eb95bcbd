//! askdesk: multi-tab assistant service with document-grounded answers
//!
//! This crate provides the core of a tabbed assistant application. It ingests
//! documents (PDF, DOCX, text, Markdown or pasted notes), packs their content
//! into provider-neutral prompts under per-provider size budgets, and
//! dispatches them to OpenAI, Anthropic, Google or a local Ollama instance
//! with retry and timeout handling.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ingestion;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod tabs;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use tabs::TabKind;
pub use types::{
    document::{Chunk, NormalizedText, SourceDocument, SourceFormat},
    prompt::NeutralPrompt,
    query::{AnswerStyle, AskRequest, JobMatchRequest},
    response::{AskResponse, ProviderResponse},
};
