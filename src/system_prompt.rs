//! System prompts for the orchestrator and the answer generator
//!
//! Built-in defaults can be replaced per deployment by dropping
//! `orchestrator.md` and/or `generate_answer.md` into a prompt directory.

use crate::config::ConfigError;
use std::path::Path;

/// File name of the orchestrator prompt override
pub const ORCHESTRATOR_FILE: &str = "orchestrator.md";

/// File name of the answer prompt override
pub const ANSWER_FILE: &str = "generate_answer.md";

const ORCHESTRATOR_PROMPT: &str = r"You are the planning step of a company knowledge assistant. Read the conversation transcript and decide the single next action.

- Call hr_doc_retriever for questions about internal HR policies, leave, benefits or welfare.
- Call wiki_doc_retriever for general-knowledge questions.
- Call generate_answer once the transcript already holds enough retrieved material to answer, or when no tool can provide useful information.

Always respond with exactly one tool call. Retrieval queries should be short keyword phrases.";

const ANSWER_PROMPT: &str = r"You are a company knowledge assistant. Answer the user's latest question using the conversation transcript, including any retrieved documents shown as tool output.

Ground every statement in the retrieved material. If the material does not contain the answer, say so plainly instead of guessing. Be concise.";

/// Prompt pair used by one run loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompts {
    pub orchestrator: String,
    pub answer: String,
}

impl Default for SystemPrompts {
    fn default() -> Self {
        Self {
            orchestrator: ORCHESTRATOR_PROMPT.to_string(),
            answer: ANSWER_PROMPT.to_string(),
        }
    }
}

impl SystemPrompts {
    /// Load overrides from `dir`, falling back to the built-in prompt for
    /// any file that is absent.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let defaults = Self::default();
        Ok(Self {
            orchestrator: read_override(&dir.join(ORCHESTRATOR_FILE))?
                .unwrap_or(defaults.orchestrator),
            answer: read_override(&dir.join(ANSWER_FILE))?.unwrap_or(defaults.answer),
        })
    }
}

fn read_override(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Prompt {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mention_finalize_tool() {
        let prompts = SystemPrompts::default();
        assert!(prompts.orchestrator.contains("generate_answer"));
        assert!(!prompts.answer.is_empty());
    }

    #[test]
    fn test_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ORCHESTRATOR_FILE), "  plan carefully \n").unwrap();

        let prompts = SystemPrompts::load(dir.path()).unwrap();
        assert_eq!(prompts.orchestrator, "plan carefully");
        assert_eq!(prompts.answer, SystemPrompts::default().answer);
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let prompts = SystemPrompts::load("/nonexistent/omni-prompts").unwrap();
        assert_eq!(prompts, SystemPrompts::default());
    }
}
