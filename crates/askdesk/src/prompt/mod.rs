//! Prompt assembly under provider budgets

mod assembler;

pub use assembler::{AssembledPrompt, PromptAssembler};
