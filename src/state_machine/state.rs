//! Run phases

use serde::Serialize;

/// Phase of a single orchestration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Phase {
    /// Asking the model for the next action
    #[default]
    Orchestrating,

    /// Running the tool calls of the latest assistant message
    ExecutingTools,

    /// Streaming the final answer
    Generating,

    /// Answer fully streamed (terminal)
    Done,

    /// Unrecoverable error (terminal)
    Failed { message: String },
}

impl Phase {
    /// Check if this is a terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Orchestrating => "orchestrating",
            Phase::ExecutingTools => "executing_tools",
            Phase::Generating => "generating",
            Phase::Done => "done",
            Phase::Failed { .. } => "failed",
        }
    }
}
