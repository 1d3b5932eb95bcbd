//! Assistant tab catalog
//!
//! Each tab carries a default system prompt and a user-prompt template.
//! Tabs resolve from their wire names; unknown names are rejected before
//! any provider work happens.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::AnswerStyle;

/// The assistant tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    /// Recipe suggestions from ingredients and preferences
    Recipe,
    /// Q&A over study notes
    #[default]
    StudyNotes,
    /// Candidate profile vs job description
    JobMatch,
    /// Plain-language code explanations
    CodeExplainer,
    /// Teaching case study generation
    CaseStudy,
}

impl TabKind {
    /// All tabs, in menu order
    pub fn all() -> &'static [TabKind] {
        &[
            Self::Recipe,
            Self::StudyNotes,
            Self::JobMatch,
            Self::CodeExplainer,
            Self::CaseStudy,
        ]
    }

    /// Resolve a tab from its wire name
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "recipe" => Ok(Self::Recipe),
            "study_notes" => Ok(Self::StudyNotes),
            "job_match" => Ok(Self::JobMatch),
            "code_explainer" => Ok(Self::CodeExplainer),
            "case_study" => Ok(Self::CaseStudy),
            _ => Err(Error::UnknownTab(name.to_string())),
        }
    }

    /// Wire name used in requests
    pub fn name(&self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::StudyNotes => "study_notes",
            Self::JobMatch => "job_match",
            Self::CodeExplainer => "code_explainer",
            Self::CaseStudy => "case_study",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Recipe => "Recipe Recommendation",
            Self::StudyNotes => "Study Notes Question And Answer",
            Self::JobMatch => "Basic Job Match Assistant",
            Self::CodeExplainer => "Simple Code Explainer",
            Self::CaseStudy => "Virtual Case Study Creator",
        }
    }

    /// One-line description for the catalog listing
    pub fn description(&self) -> &'static str {
        match self {
            Self::Recipe => "Suggests recipes from ingredients and preferences",
            Self::StudyNotes => "Answers questions grounded in uploaded or pasted study notes",
            Self::JobMatch => "Scores a candidate profile against a job description",
            Self::CodeExplainer => "Explains code in simple terms",
            Self::CaseStudy => "Creates realistic case studies for analysis",
        }
    }

    /// Default system prompt for this tab
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Recipe => {
                "You are a helpful chef assistant. Ask clarifying questions and suggest recipes."
            }
            Self::StudyNotes => {
                "You help students with Q&A based on study notes. Keep answers concise and structured."
            }
            Self::JobMatch => {
                "You assist with matching candidate skills to job descriptions and suggest improvements."
            }
            Self::CodeExplainer => {
                "You explain code in simple terms with step-by-step reasoning and examples."
            }
            Self::CaseStudy => {
                "You create realistic case studies with constraints and questions for analysis."
            }
        }
    }

    /// Heading used for included document text
    fn context_label(&self) -> &'static str {
        match self {
            Self::StudyNotes => "Study Notes",
            Self::CodeExplainer => "Code",
            _ => "Reference Material",
        }
    }

    /// Render the user message for this tab.
    ///
    /// The context block is omitted entirely when no document text was
    /// included; the question always appears verbatim.
    pub fn render_user_text(
        &self,
        question: &str,
        context: &str,
        style: AnswerStyle,
        detail: u8,
    ) -> String {
        let mut text = String::new();

        if *self == Self::StudyNotes {
            text.push_str(
                "Using the student's study notes below, answer the question. \
                 Cite key concepts from the notes, avoid fabricating content, \
                 and keep it well-structured. ",
            );
        }
        text.push_str(style.directive());
        text.push_str(&format!(" Detail level: {}.", detail));

        if !context.is_empty() {
            text.push_str(&format!("\n\n{}:\n{}", self.context_label(), context));
        }

        text.push_str(&format!("\n\nQuestion:\n{}", question));
        text
    }
}

/// Render the job-match comparison prompt
pub fn render_job_match(job_description: &str, candidate_profile: &str) -> String {
    format!(
        "Please analyze the following job description and candidate profile. \
         Provide: 1) Match score (0-100) 2) Key matching skills 3) Gaps and \
         suggestions 4) A brief tailored summary.\n\nJob Description:\n{}\n\nCandidate Profile:\n{}",
        job_description, candidate_profile
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_resolves_known_tabs() {
        assert_eq!(TabKind::from_name("study_notes").unwrap(), TabKind::StudyNotes);
        assert_eq!(TabKind::from_name("JOB_MATCH").unwrap(), TabKind::JobMatch);
        assert!(matches!(
            TabKind::from_name("weather"),
            Err(Error::UnknownTab(_))
        ));
    }

    #[test]
    fn test_wire_names_round_trip() {
        for tab in TabKind::all() {
            assert_eq!(TabKind::from_name(tab.name()).unwrap(), *tab);
            let json = serde_json::to_string(tab).unwrap();
            assert_eq!(json, format!("\"{}\"", tab.name()));
        }
    }

    #[test]
    fn test_every_tab_has_catalog_text() {
        for tab in TabKind::all() {
            assert!(!tab.title().is_empty());
            assert!(!tab.description().is_empty());
            assert!(!tab.system_prompt().is_empty());
        }
    }

    #[test]
    fn test_study_notes_template() {
        let text = TabKind::StudyNotes.render_user_text(
            "What does it say?",
            "Hello world.",
            AnswerStyle::BulletPoints,
            3,
        );
        assert!(text.contains("Study Notes:\nHello world."));
        assert!(text.contains("Question:\nWhat does it say?"));
        assert!(text.contains("bullet points"));
        assert!(text.contains("Detail level: 3."));
    }

    #[test]
    fn test_empty_context_omits_notes_block() {
        let text = TabKind::StudyNotes.render_user_text(
            "What is osmosis?",
            "",
            AnswerStyle::Numbered,
            2,
        );
        assert!(!text.contains("Study Notes:"));
        assert!(text.contains("Question:\nWhat is osmosis?"));
    }

    #[test]
    fn test_job_match_template_sections() {
        let text = render_job_match("Rust engineer, 3+ years.", "5 years of Rust.");
        assert!(text.contains("Match score (0-100)"));
        assert!(text.contains("Job Description:\nRust engineer, 3+ years."));
        assert!(text.contains("Candidate Profile:\n5 years of Rust."));
    }
}
