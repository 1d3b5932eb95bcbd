//! File loading and normalization
//!
//! Turns uploaded bytes or pasted text into [`NormalizedText`]. Text files
//! are decoded strictly, PDFs are extracted page by page, and DOCX files
//! contribute their paragraph text in document order. Everything else is
//! rejected up front.

use crate::error::{Error, Result};
use crate::types::{NormalizedText, SourceDocument, SourceFormat};

/// Size-capped document loader
pub struct DocumentLoader {
    /// Upload cap in bytes
    max_size: usize,
}

impl DocumentLoader {
    /// Create a loader with the given upload cap
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    /// Load and normalize an uploaded file
    pub fn load(&self, doc: &SourceDocument) -> Result<NormalizedText> {
        if doc.bytes.len() > self.max_size {
            return Err(Error::FileTooLarge {
                filename: doc.filename.clone(),
                size: doc.bytes.len() as u64,
                limit: self.max_size as u64,
            });
        }

        let format = doc.declared_format().ok_or_else(|| Error::UnsupportedFormat {
            extension: doc.extension(),
            supported: SourceFormat::supported_list().to_string(),
        })?;

        match format {
            SourceFormat::Txt | SourceFormat::Markdown => {
                decode_utf8(&doc.filename, &doc.bytes, format)
            }
            SourceFormat::Pdf => load_pdf(&doc.filename, &doc.bytes),
            SourceFormat::Docx => load_docx(&doc.filename, &doc.bytes),
            // declared_format never yields Pasted
            SourceFormat::Pasted => Err(Error::UnsupportedFormat {
                extension: doc.extension(),
                supported: SourceFormat::supported_list().to_string(),
            }),
        }
    }

    /// Normalize pasted text (no decode step, no size cap)
    pub fn load_pasted(&self, text: impl Into<String>) -> NormalizedText {
        NormalizedText::from_pasted(text)
    }
}

/// Strict UTF-8 decode for .txt and .md uploads. Invalid bytes are an
/// error, never a lossy replacement.
fn decode_utf8(filename: &str, data: &[u8], format: SourceFormat) -> Result<NormalizedText> {
    let text = std::str::from_utf8(data).map_err(|e| Error::Decode {
        filename: filename.to_string(),
        offset: e.valid_up_to(),
    })?;
    Ok(NormalizedText::new(filename, format, text.to_string()))
}

/// Extract PDF text page by page, concatenated in page order with a blank
/// line between pages. Char offsets of each page start are retained for
/// provenance.
fn load_pdf(filename: &str, data: &[u8]) -> Result<NormalizedText> {
    let pages = match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(pages) => pages,
        Err(e) => {
            // Distinguish a corrupt file from an extraction failure
            let detail = match lopdf::Document::load_mem(data) {
                Ok(doc) => {
                    format!("text extraction failed across {} page(s): {}", doc.get_pages().len(), e)
                }
                Err(load_err) => format!("not a readable PDF: {}", load_err),
            };
            return Err(Error::file_parse(filename, detail));
        }
    };

    let mut text = String::new();
    let mut page_offsets = Vec::with_capacity(pages.len());
    let mut char_count = 0usize;

    for page in &pages {
        if !text.is_empty() {
            text.push_str("\n\n");
            char_count += 2;
        }
        page_offsets.push(char_count);

        let page_text = page.trim();
        char_count += page_text.chars().count();
        text.push_str(page_text);
    }

    tracing::debug!(
        filename,
        pages = pages.len(),
        chars = char_count,
        "extracted pdf text"
    );

    Ok(NormalizedText::with_pages(filename, text, page_offsets))
}

/// Extract DOCX paragraph text in document order, one paragraph per line
fn load_docx(filename: &str, data: &[u8]) -> Result<NormalizedText> {
    let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut paragraph = String::new();
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            paragraph.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(paragraph);
        }
    }

    Ok(NormalizedText::new(
        filename,
        SourceFormat::Docx,
        paragraphs.join("\n"),
    ))
}
