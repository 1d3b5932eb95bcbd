//! Document and chunk types for request-scoped ingestion

use serde::{Deserialize, Serialize};

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Pasted text, no file involved
    Pasted,
}

impl SourceFormat {
    /// Detect format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(Self::Txt),
            "md" | "markdown" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Pasted => "Pasted Text",
        }
    }

    /// Extension list quoted in unsupported-format errors
    pub fn supported_list() -> &'static str {
        ".txt, .md, .pdf, .docx"
    }
}

/// An uploaded file before normalization.
///
/// Lives only long enough to produce [`NormalizedText`]; nothing holds on
/// to the raw bytes after loading.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Filename as uploaded, extension included
    pub filename: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Lowercased filename extension, empty when there is none
    pub fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    /// Format declared by the filename extension
    pub fn declared_format(&self) -> Option<SourceFormat> {
        SourceFormat::from_extension(&self.extension())
    }
}

/// Text extracted from one source, ready for chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedText {
    /// Where the text came from (filename, or "pasted text")
    pub source: String,
    /// Detected format
    pub format: SourceFormat,
    /// Full extracted text
    pub text: String,
    /// Char offset where each page starts, in page order. Empty for
    /// sources without page structure.
    pub page_offsets: Vec<usize>,
}

impl NormalizedText {
    /// Create normalized text for a single-body source
    pub fn new(source: impl Into<String>, format: SourceFormat, text: String) -> Self {
        Self {
            source: source.into(),
            format,
            text,
            page_offsets: Vec::new(),
        }
    }

    /// Create normalized text from pasted input
    pub fn from_pasted(text: impl Into<String>) -> Self {
        Self {
            source: "pasted text".to_string(),
            format: SourceFormat::Pasted,
            text: text.into(),
            page_offsets: Vec::new(),
        }
    }

    /// Create normalized text with page structure (PDF)
    pub fn with_pages(source: impl Into<String>, text: String, page_offsets: Vec<usize>) -> Self {
        Self {
            source: source.into(),
            format: SourceFormat::Pdf,
            text,
            page_offsets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in chars (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of pages, if the source had page structure
    pub fn page_count(&self) -> Option<u32> {
        if self.page_offsets.is_empty() {
            None
        } else {
            Some(self.page_offsets.len() as u32)
        }
    }

    /// 1-indexed page containing the given char offset
    pub fn page_for_char(&self, offset: usize) -> Option<u32> {
        if self.page_offsets.is_empty() {
            return None;
        }
        let idx = self.page_offsets.partition_point(|&start| start <= offset);
        Some(idx.max(1) as u32)
    }
}

/// A contiguous piece of normalized text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk within the document
    pub index: usize,
    /// Text content
    pub content: String,
    /// Char span in the normalized text
    pub char_start: usize,
    pub char_end: usize,
    /// 1-indexed page the chunk starts on, if the source had pages
    pub page: Option<u32>,
}

impl Chunk {
    pub fn new(index: usize, content: String, char_start: usize, char_end: usize) -> Self {
        Self {
            index,
            content,
            char_start,
            char_end,
            page: None,
        }
    }

    /// Content length in chars
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("txt"), Some(SourceFormat::Txt));
        assert_eq!(SourceFormat::from_extension("MD"), Some(SourceFormat::Markdown));
        assert_eq!(SourceFormat::from_extension("Pdf"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_extension("docx"), Some(SourceFormat::Docx));
        assert_eq!(SourceFormat::from_extension("xlsx"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn test_page_for_char() {
        // Three pages starting at 0, 100, 250
        let text = NormalizedText::with_pages("doc.pdf", String::new(), vec![0, 100, 250]);
        assert_eq!(text.page_count(), Some(3));
        assert_eq!(text.page_for_char(0), Some(1));
        assert_eq!(text.page_for_char(99), Some(1));
        assert_eq!(text.page_for_char(100), Some(2));
        assert_eq!(text.page_for_char(249), Some(2));
        assert_eq!(text.page_for_char(250), Some(3));
        assert_eq!(text.page_for_char(9999), Some(3));
    }

    #[test]
    fn test_pasted_text_has_no_pages() {
        let text = NormalizedText::from_pasted("some notes");
        assert_eq!(text.format, SourceFormat::Pasted);
        assert_eq!(text.page_count(), None);
        assert_eq!(text.page_for_char(3), None);
    }

    #[test]
    fn test_source_document_declares_its_format() {
        let doc = SourceDocument::new("Notes.PDF", vec![1, 2, 3]);
        assert_eq!(doc.extension(), "pdf");
        assert_eq!(doc.declared_format(), Some(SourceFormat::Pdf));

        let bare = SourceDocument::new("README", Vec::new());
        assert_eq!(bare.extension(), "");
        assert_eq!(bare.declared_format(), None);
    }
}
