//! Provider-neutral prompt representation

use serde::{Deserialize, Serialize};

/// An assembled prompt, independent of any provider's wire schema.
///
/// `system`, `context` and `question` are kept separate so callers can
/// inspect what was included; `user_text` is the rendered body adapters
/// actually send alongside the system instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeutralPrompt {
    /// System instruction for the provider
    pub system: String,
    /// Document text included within budget (may be empty)
    pub context: String,
    /// The user's question, verbatim
    pub question: String,
    /// Rendered user message
    pub user_text: String,
}

impl NeutralPrompt {
    /// Total prompt size in chars (system + user text)
    pub fn char_len(&self) -> usize {
        self.system.chars().count() + self.user_text.chars().count()
    }

    /// Whether any document text made it into the prompt
    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }
}
