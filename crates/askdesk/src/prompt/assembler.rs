//! Budgeted prompt assembly
//!
//! Packs as many chunks as the active provider's character budget allows
//! into a [`NeutralPrompt`]. Chunks are taken as a prefix in document
//! order; the question itself is always included, and only a question that
//! exceeds the provider's hard limit is rejected outright.

use crate::error::{Error, Result};
use crate::tabs::TabKind;
use crate::types::{AnswerStyle, Chunk, NeutralPrompt};

/// Result of packing chunks into a prompt
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    pub prompt: NeutralPrompt,
    /// Chunks that made it into the prompt
    pub chunks_used: usize,
    /// Chunks that were available
    pub chunks_total: usize,
}

/// Assembles provider-neutral prompts under a per-provider budget
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Pack a prefix of `chunks` into a prompt for `tab`.
    ///
    /// The budget counts chars across the system instruction and the
    /// rendered user message. When even an empty-context rendering does
    /// not fit `hard_limit`, the question is unanswerable for this
    /// provider and the call fails with [`Error::PromptTooLarge`]. When
    /// it fits the hard limit but not the budget, the prompt goes out
    /// without any document text.
    pub fn assemble(
        &self,
        tab: TabKind,
        question: &str,
        style: AnswerStyle,
        detail: u8,
        chunks: &[Chunk],
        provider: &str,
        context_budget: usize,
        hard_limit: usize,
    ) -> Result<AssembledPrompt> {
        let system = tab.system_prompt();
        let system_chars = system.chars().count();

        let bare = tab.render_user_text(question, "", style, detail);
        let base_chars = system_chars + bare.chars().count();
        if base_chars > hard_limit {
            return Err(Error::PromptTooLarge {
                provider: provider.to_string(),
                limit: hard_limit,
            });
        }

        // Chars the context block wrapper adds beyond the context itself,
        // measured against a one-char probe so label changes stay covered.
        let probe = tab.render_user_text(question, "x", style, detail);
        let wrapper_chars = probe.chars().count() - bare.chars().count() - 1;

        let mut chunks_used = 0;
        let mut context_chars = 0;
        for chunk in chunks {
            let separator = if chunks_used == 0 { 0 } else { 2 };
            let candidate = context_chars + separator + chunk.char_len();
            if base_chars + wrapper_chars + candidate > context_budget {
                break;
            }
            context_chars = candidate;
            chunks_used += 1;
        }

        let context = chunks[..chunks_used]
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let user_text = tab.render_user_text(question, &context, style, detail);

        tracing::debug!(
            tab = tab.name(),
            provider,
            chunks_used,
            chunks_total = chunks.len(),
            prompt_chars = system_chars + user_text.chars().count(),
            "assembled prompt"
        );

        Ok(AssembledPrompt {
            prompt: NeutralPrompt {
                system: system.to_string(),
                context,
                question: question.to_string(),
                user_text,
            },
            chunks_used,
            chunks_total: chunks.len(),
        })
    }

    /// Wrap an already-rendered user message, enforcing only the hard
    /// limit. Used for flows that build their whole body up front.
    pub fn assemble_direct(
        &self,
        system: impl Into<String>,
        user_text: impl Into<String>,
        provider: &str,
        hard_limit: usize,
    ) -> Result<NeutralPrompt> {
        let system = system.into();
        let user_text = user_text.into();
        let total = system.chars().count() + user_text.chars().count();
        if total > hard_limit {
            return Err(Error::PromptTooLarge {
                provider: provider.to_string(),
                limit: hard_limit,
            });
        }
        Ok(NeutralPrompt {
            system,
            context: String::new(),
            question: user_text.clone(),
            user_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, content: &str) -> Chunk {
        let chars = content.chars().count();
        Chunk::new(index, content.to_string(), index * 1000, index * 1000 + chars)
    }

    fn assemble_with_budget(
        chunks: &[Chunk],
        context_budget: usize,
    ) -> Result<AssembledPrompt> {
        PromptAssembler::new().assemble(
            TabKind::StudyNotes,
            "What is osmosis?",
            AnswerStyle::BulletPoints,
            3,
            chunks,
            "openai",
            context_budget,
            context_budget * 4,
        )
    }

    #[test]
    fn test_all_chunks_fit_a_generous_budget() {
        let chunks = vec![chunk(0, "Osmosis one."), chunk(1, "Osmosis two.")];
        let assembled = assemble_with_budget(&chunks, 100_000).unwrap();

        assert_eq!(assembled.chunks_used, 2);
        assert_eq!(assembled.chunks_total, 2);
        assert_eq!(assembled.prompt.context, "Osmosis one.\n\nOsmosis two.");
        assert!(assembled.prompt.user_text.contains("Osmosis two."));
        assert!(assembled.prompt.user_text.contains("What is osmosis?"));
    }

    #[test]
    fn test_budget_drops_trailing_chunks() {
        let chunks = vec![
            chunk(0, &"a".repeat(40)),
            chunk(1, &"b".repeat(40)),
            chunk(2, &"c".repeat(40)),
        ];
        let full = assemble_with_budget(&chunks, 100_000).unwrap();
        assert_eq!(full.chunks_used, 3);

        let tight = assemble_with_budget(&chunks, full.prompt.char_len() - 1).unwrap();
        assert_eq!(tight.chunks_used, 2);
        assert!(tight.prompt.context.starts_with(&"a".repeat(40)));
        assert!(tight.prompt.context.ends_with(&"b".repeat(40)));
        assert!(tight.prompt.char_len() < full.prompt.char_len());
    }

    #[test]
    fn test_packing_stops_at_the_first_chunk_that_does_not_fit() {
        let chunks = vec![
            chunk(0, &"a".repeat(20)),
            chunk(1, &"b".repeat(5000)),
            chunk(2, &"c".repeat(20)),
        ];
        let assembled = assemble_with_budget(&chunks, 600).unwrap();

        // The oversized middle chunk ends packing; the small chunk after
        // it is not pulled forward.
        assert_eq!(assembled.chunks_used, 1);
        assert_eq!(assembled.prompt.context, "a".repeat(20));
    }

    #[test]
    fn test_rendered_prompt_stays_within_budget() {
        let chunks: Vec<Chunk> = (0..50).map(|i| chunk(i, &"z".repeat(97))).collect();
        let budget = 2_000;
        let assembled = assemble_with_budget(&chunks, budget).unwrap();

        assert!(assembled.chunks_used > 0);
        assert!(assembled.chunks_used < chunks.len());
        assert!(assembled.prompt.char_len() <= budget);
    }

    #[test]
    fn test_question_survives_a_budget_too_small_for_any_chunk() {
        let chunks = vec![chunk(0, &"a".repeat(500))];
        let assembled = assemble_with_budget(&chunks, 10).unwrap();

        assert_eq!(assembled.chunks_used, 0);
        assert!(!assembled.prompt.has_context());
        assert!(assembled.prompt.user_text.contains("What is osmosis?"));
        assert!(!assembled.prompt.user_text.contains("Study Notes:"));
    }

    #[test]
    fn test_question_beyond_hard_limit_is_rejected() {
        let question = "q".repeat(50_000);
        let err = PromptAssembler::new()
            .assemble(
                TabKind::StudyNotes,
                &question,
                AnswerStyle::BulletPoints,
                3,
                &[],
                "openai",
                10_000,
                40_000,
            )
            .unwrap_err();

        match err {
            Error::PromptTooLarge { provider, limit } => {
                assert_eq!(provider, "openai");
                assert_eq!(limit, 40_000);
            }
            other => panic!("expected PromptTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_direct_prompt_checks_only_the_hard_limit() {
        let assembler = PromptAssembler::new();
        let ok = assembler
            .assemble_direct("system", "short body", "anthropic", 1_000)
            .unwrap();
        assert_eq!(ok.user_text, "short body");
        assert!(!ok.has_context());

        let err = assembler
            .assemble_direct("system", "x".repeat(2_000), "anthropic", 1_000)
            .unwrap_err();
        assert!(matches!(err, Error::PromptTooLarge { .. }));
    }

    #[test]
    fn test_loaded_file_reaches_the_prompt() {
        use crate::ingestion::{DocumentLoader, TextChunker};
        use crate::types::SourceDocument;

        let doc = SourceDocument::new("notes.txt", b"Hello world.".to_vec());
        let text = DocumentLoader::new(1024).load(&doc).unwrap();
        let chunks = TextChunker::new(1200, 0).chunk(&text);
        assert_eq!(chunks.len(), 1);

        let assembled = PromptAssembler::new()
            .assemble(
                TabKind::StudyNotes,
                "What does the note say?",
                AnswerStyle::BulletPoints,
                3,
                &chunks,
                "openai",
                48_000,
                192_000,
            )
            .unwrap();

        assert_eq!(assembled.chunks_used, 1);
        assert!(assembled.prompt.user_text.contains("Hello world."));
        assert!(assembled
            .prompt
            .user_text
            .contains("Format the answer as concise bullet points."));
        assert!(assembled.prompt.user_text.contains("What does the note say?"));
    }
}
