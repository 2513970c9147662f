//! Conversation state owned by a single run

mod history;
mod message;

pub use history::format_history;
pub use message::{Message, ToolCallRequest};

use crate::tools::ToolOutput;
use std::collections::HashMap;

/// Everything a run knows about its conversation
///
/// Messages are append-only and in chronological order. Exactly one run
/// owns a state; nothing is shared across runs.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    /// Completed tool-execution rounds; bounds the orchestration cycle
    pub num_tries: u32,
    /// Last raw output per tool name, for consumers outside the transcript
    pub tool_results: HashMap<String, ToolOutput>,
}

impl ConversationState {
    /// Seed a run with the user's query
    pub fn seeded(query: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(query)],
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Transcript of the whole conversation so far
    pub fn transcript(&self) -> String {
        format_history(&self.messages)
    }
}
