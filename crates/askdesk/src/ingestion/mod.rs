//! Document ingestion pipeline
//!
//! Loading and normalization of uploaded or pasted source material, plus
//! sentence-aware chunking of the normalized text.

mod chunker;
mod loader;

pub use chunker::TextChunker;
pub use loader::DocumentLoader;
