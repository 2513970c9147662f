//! Common types for language model interactions

use crate::conversation::ToolCallRequest;
use futures::stream::BoxStream;

use super::LlmError;

/// Lazy, finite sequence of answer fragments
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// How the model is allowed to respond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// Free text or tool calls, at the model's discretion
    #[default]
    Auto,
    /// The model must answer with exactly one tool call
    Required,
    /// Tools are not offered
    None,
}

/// Language model request
///
/// The conversation is flattened: a system prompt plus the rendered
/// transcript delivered as a single user turn.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: String,
    pub transcript: String,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
}

impl LlmRequest {
    pub fn new(system: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            transcript: transcript.into(),
            tools: Vec::new(),
            tool_choice: ToolChoice::None,
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>, choice: ToolChoice) -> Self {
        self.tools = tools;
        self.tool_choice = choice;
        self
    }
}

/// Tool definition advertised to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Non-streaming model response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCallRequest>,
    pub usage: Usage,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self {
            tool_calls: vec![call],
            ..Self::default()
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
