//! Core types for the assistant service

pub mod document;
pub mod prompt;
pub mod query;
pub mod response;

pub use document::{Chunk, NormalizedText, SourceDocument, SourceFormat};
pub use prompt::NeutralPrompt;
pub use query::{AnswerStyle, AskRequest, JobMatchRequest, DETAIL_DEFAULT, DETAIL_MAX, DETAIL_MIN};
pub use response::{AskResponse, ProviderResponse, StyleInfo, TabInfo, TabListResponse, TokenUsage};
