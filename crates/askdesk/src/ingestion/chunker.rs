//! Text chunking with position and page tracking
//!
//! Chunks prefer sentence boundaries and fall back to a hard cutoff when a
//! single sentence exceeds the limit. With zero overlap the chunks partition
//! the input exactly: concatenating them in order reconstructs the text.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, NormalizedText};

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Maximum chunk size in characters
    max_chunk_size: usize,
    /// Overlap carried into each following chunk, in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(max_chunk_size: usize, overlap: usize) -> Self {
        Self {
            max_chunk_size,
            overlap,
        }
    }

    /// Chunk normalized text into ordered pieces.
    ///
    /// All offsets are char offsets into the source text. Every chunk's
    /// content equals the source slice `[char_start, char_end)`, so the
    /// overlap portion at the head of a chunk is reflected in its span.
    pub fn chunk(&self, source: &NormalizedText) -> Vec<Chunk> {
        if source.text.is_empty() {
            return Vec::new();
        }

        // Room left for new content once the overlap tail is carried over
        let capacity = self.max_chunk_size.saturating_sub(self.overlap).max(1);
        let pieces = split_pieces(&source.text, capacity);

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut current = String::new();
        // Chars of new content in `current`, excluding any carried tail
        let mut current_chars = 0usize;
        // Source char offset where `current` begins, including the tail
        let mut start = 0usize;
        // Source char offset one past the last consumed piece
        let mut pos = 0usize;

        for piece in pieces {
            let piece_chars = piece.chars().count();

            if current_chars > 0 && current_chars + piece_chars > capacity {
                push_chunk(&mut chunks, source, std::mem::take(&mut current), start, pos);
                let (tail, tail_chars) = overlap_tail(&chunks[chunks.len() - 1].content, self.overlap);
                start = pos - tail_chars;
                current = tail;
                current_chars = 0;
            }

            current.push_str(piece);
            current_chars += piece_chars;
            pos += piece_chars;
        }

        if current_chars > 0 {
            push_chunk(&mut chunks, source, current, start, pos);
        }

        chunks
    }
}

/// Split text into sentence-bound pieces, hard-splitting any sentence
/// longer than `capacity` chars. The pieces partition the text exactly.
fn split_pieces(text: &str, capacity: usize) -> Vec<&str> {
    let mut pieces = Vec::new();

    for sentence in text.split_sentence_bounds() {
        if sentence.chars().count() <= capacity {
            pieces.push(sentence);
            continue;
        }

        let mut remaining = sentence;
        while !remaining.is_empty() {
            let split_at = byte_index_of_char(remaining, capacity);
            let (head, rest) = remaining.split_at(split_at);
            pieces.push(head);
            remaining = rest;
        }
    }

    pieces
}

/// Byte index of the nth char, or the string's end if shorter
fn byte_index_of_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Last `overlap` chars of a chunk, taken on a char boundary
fn overlap_tail(content: &str, overlap: usize) -> (String, usize) {
    if overlap == 0 {
        return (String::new(), 0);
    }
    let total = content.chars().count();
    let take = overlap.min(total);
    let byte_start = byte_index_of_char(content, total - take);
    (content[byte_start..].to_string(), take)
}

fn push_chunk(
    chunks: &mut Vec<Chunk>,
    source: &NormalizedText,
    content: String,
    char_start: usize,
    char_end: usize,
) {
    let mut chunk = Chunk::new(chunks.len(), content, char_start, char_end);
    chunk.page = source.page_for_char(char_start);
    chunks.push(chunk);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NormalizedText;

    fn pasted(text: &str) -> NormalizedText {
        NormalizedText::from_pasted(text)
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = TextChunker::new(100, 0);
        assert!(chunker.chunk(&pasted("")).is_empty());
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunker = TextChunker::new(100, 0);
        let chunks = chunker.chunk(&pasted("Hello world."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Hello world.");
        assert_eq!(chunks[0].char_start, 0);
        assert_eq!(chunks[0].char_end, 12);
    }

    #[test]
    fn test_concatenation_reconstructs_text_at_zero_overlap() {
        let text = "The mitochondria is the powerhouse of the cell. \
                    Osmosis moves water across membranes. Diffusion spreads \
                    solutes from high to low concentration. Enzymes lower \
                    activation energy. ATP stores energy in phosphate bonds.";
        let chunker = TextChunker::new(60, 0);
        let chunks = chunker.chunk(&pasted(text));

        assert!(chunks.len() > 1);
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.char_len() <= 60);
            assert_eq!(chunk.char_len(), chunk.char_end - chunk.char_start);
        }
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].char_end, pair[1].char_start);
        }
    }

    #[test]
    fn test_hard_cutoff_splits_oversized_sentence() {
        // No sentence boundaries at all
        let text = "x".repeat(100);
        let chunker = TextChunker::new(30, 0);
        let chunks = chunker.chunk(&pasted(&text));

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].char_len(), 30);
        assert_eq!(chunks[3].char_len(), 10);
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_overlap_carries_predecessor_tail() {
        let text = "First sentence here. Second sentence here. Third sentence here. \
                    Fourth sentence here. Fifth sentence here.";
        let chunker = TextChunker::new(50, 10);
        let chunks = chunker.chunk(&pasted(text));

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev = &pair[0].content;
            let tail: String = prev
                .chars()
                .skip(prev.chars().count().saturating_sub(10))
                .collect();
            assert!(pair[1].content.starts_with(&tail));
            assert!(pair[1].char_len() <= 50);
            assert!(pair[1].char_start < pair[0].char_end);
        }
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota kappa.";
        let chunker = TextChunker::new(25, 5);
        let first = chunker.chunk(&pasted(text));
        let second = chunker.chunk(&pasted(text));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.char_start, b.char_start);
            assert_eq!(a.char_end, b.char_end);
        }
    }

    #[test]
    fn test_one_chunk_per_page_when_size_matches() {
        // Three pages joined with a blank line, as the loader produces them
        let pages = [
            "Alpha beta gamma one.",
            "Alpha beta gamma two.",
            "Alpha beta gamma six.",
        ];
        let text = pages.join("\n\n");
        let page_len = pages[0].chars().count() + 2; // page plus separator
        let source = NormalizedText::with_pages("notes.pdf", text.clone(), vec![0, 23, 46]);

        let chunker = TextChunker::new(page_len, 0);
        let chunks = chunker.chunk(&source);

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.content.contains(pages[i]));
            assert_eq!(chunk.page, Some(i as u32 + 1));
        }
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_trailing_fragment_keeps_coverage() {
        let text = "A full sentence that takes room. Tail";
        let chunker = TextChunker::new(33, 0);
        let chunks = chunker.chunk(&pasted(text));

        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
        assert_eq!(chunks.last().unwrap().content, "Tail");
    }

    #[test]
    fn test_multibyte_text_respects_char_limits() {
        let text = "Ünïcödé tëxt hërë. Mörë ünïcödé cöntënt här. Ännü mërä tëxt.";
        let chunker = TextChunker::new(25, 0);
        let chunks = chunker.chunk(&pasted(text));

        for chunk in &chunks {
            assert!(chunk.char_len() <= 25);
        }
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }
}
