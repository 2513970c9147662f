//! Tools the orchestrator can dispatch to
//!
//! Tools are stateless singletons; per-call context arrives via `ToolContext`.

mod finalize;
mod retriever;

pub use finalize::{GenerateAnswerTool, FINALIZE_TOOL};
pub use retriever::{DocRetrieverTool, RetrieverArgs};

use crate::llm::ToolDefinition;
use crate::search::{Document, DocumentSearch};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Raw result of a tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Documents(Vec<Document>),
}

impl ToolOutput {
    /// Text handed to the model: documents are joined by a blank line
    pub fn to_payload(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Documents(docs) => docs
                .iter()
                .map(|d| d.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("search backend failed: {0}")]
    Search(#[from] crate::search::SearchError),
    #[error("cancelled")]
    Cancelled,
}

/// Context for a single tool invocation
#[derive(Clone)]
pub struct ToolContext {
    /// Cancellation signal for long-running operations
    pub cancel: CancellationToken,
    /// The run this call belongs to
    pub run_id: String,
}

impl ToolContext {
    pub fn new(cancel: CancellationToken, run_id: impl Into<String>) -> Self {
        Self {
            cancel,
            run_id: run_id.into(),
        }
    }
}

/// Trait for tools that can be executed by the agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, unique within a registry
    fn name(&self) -> &str;

    /// Tool description for the model
    fn description(&self) -> String;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    /// Run the tool. Implementations should observe `ctx.cancel`.
    async fn run(&self, input: Value, ctx: ToolContext) -> Result<ToolOutput, ToolError>;
}

/// Fixed collection of tools, built once and shared read-only across runs
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from a static list. The first tool registered under
    /// a name wins; later duplicates are dropped.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut kept: Vec<Arc<dyn Tool>> = Vec::with_capacity(tools.len());
        let mut by_name = HashMap::new();
        for tool in tools {
            if by_name.contains_key(tool.name()) {
                tracing::warn!(tool = %tool.name(), "Duplicate tool name ignored");
                continue;
            }
            by_name.insert(tool.name().to_string(), kept.len());
            kept.push(tool);
        }
        Self {
            tools: kept,
            by_name,
        }
    }

    /// Standard retrieval tool set: HR and wiki retrievers plus the
    /// finalize pseudo-tool
    pub fn standard(search: Arc<dyn DocumentSearch>) -> Self {
        Self::new(vec![
            Arc::new(DocRetrieverTool::hr(search.clone())),
            Arc::new(DocRetrieverTool::wiki(search)),
            Arc::new(GenerateAnswerTool),
        ])
    }

    /// Case-sensitive exact lookup
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| self.tools[i].clone())
    }

    /// Get all tool definitions for the model, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
