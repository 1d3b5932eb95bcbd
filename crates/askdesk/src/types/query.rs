//! Ask request types

use serde::{Deserialize, Serialize};

use crate::tabs::TabKind;

/// Formatting requested for the answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStyle {
    /// Concise bullet points
    #[default]
    BulletPoints,
    /// Numbered list
    Numbered,
    /// Flashcard question/answer pairs
    Flashcards,
    /// Short focused paragraphs
    ShortParagraphs,
    /// Hierarchical outline
    Outline,
    /// Question and answer pairs
    #[serde(rename = "qa_pairs")]
    QAPairs,
}

impl AnswerStyle {
    /// Wire name, as used in requests
    pub fn name(&self) -> &'static str {
        match self {
            Self::BulletPoints => "bullet_points",
            Self::Numbered => "numbered",
            Self::Flashcards => "flashcards",
            Self::ShortParagraphs => "short_paragraphs",
            Self::Outline => "outline",
            Self::QAPairs => "qa_pairs",
        }
    }

    /// Resolve a wire name back to a style
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|style| style.name() == name)
    }

    /// Label shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BulletPoints => "Bullet Points",
            Self::Numbered => "Numbered",
            Self::Flashcards => "Flashcards",
            Self::ShortParagraphs => "Short Paragraphs",
            Self::Outline => "Outline",
            Self::QAPairs => "Q&A",
        }
    }

    /// Directive rendered into the prompt
    pub fn directive(&self) -> &'static str {
        match self {
            Self::BulletPoints => "Format the answer as concise bullet points.",
            Self::Numbered => "Format the answer as a numbered list.",
            Self::Flashcards => {
                "Format the answer as flashcards, each a question followed by its answer."
            }
            Self::ShortParagraphs => "Format the answer as short, focused paragraphs.",
            Self::Outline => "Format the answer as a hierarchical outline.",
            Self::QAPairs => "Format the answer as question and answer pairs.",
        }
    }

    /// All styles, in menu order
    pub fn all() -> &'static [AnswerStyle] {
        &[
            Self::BulletPoints,
            Self::Numbered,
            Self::Flashcards,
            Self::ShortParagraphs,
            Self::Outline,
            Self::QAPairs,
        ]
    }
}

/// Detail level bounds for answers
pub const DETAIL_MIN: u8 = 1;
pub const DETAIL_MAX: u8 = 5;
/// Detail level used when a request omits one
pub const DETAIL_DEFAULT: u8 = 3;

fn default_detail_level() -> u8 {
    DETAIL_DEFAULT
}

fn default_provider() -> String {
    "openai".to_string()
}

/// A question against uploaded or pasted material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,

    /// Assistant tab handling the request
    #[serde(default)]
    pub tab: TabKind,

    /// Desired answer style
    #[serde(default)]
    pub style: AnswerStyle,

    /// Detail level, 1 (brief) to 5 (thorough)
    #[serde(default = "default_detail_level")]
    pub detail_level: u8,

    /// Provider to dispatch to
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model override; the provider's default model when absent
    #[serde(default)]
    pub model: Option<String>,

    /// Pasted source material (uploads arrive through the multipart route)
    #[serde(default)]
    pub notes: Option<String>,
}

impl AskRequest {
    /// Create a request with defaults
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            tab: TabKind::default(),
            style: AnswerStyle::default(),
            detail_level: default_detail_level(),
            provider: default_provider(),
            model: None,
            notes: None,
        }
    }

    /// Set the answer style
    pub fn with_style(mut self, style: AnswerStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the detail level
    pub fn with_detail(mut self, level: u8) -> Self {
        self.detail_level = level;
        self
    }

    /// Set the provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set pasted source material
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Detail level clamped to the supported range
    pub fn detail(&self) -> u8 {
        self.detail_level.clamp(DETAIL_MIN, DETAIL_MAX)
    }
}

/// Job description vs candidate profile comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchRequest {
    /// Job description text
    pub job_description: String,
    /// Candidate profile or resume text
    pub candidate_profile: String,
    /// Provider to dispatch to
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
}
