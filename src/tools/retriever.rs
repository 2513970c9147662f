//! Document retrieval tools backed by a `DocumentSearch`

use super::{Tool, ToolContext, ToolError, ToolOutput};
use crate::search::DocumentSearch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Arguments accepted by every retriever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverArgs {
    pub query: String,
    #[serde(default = "default_topk")]
    pub topk: usize,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_topk() -> usize {
    10
}

fn default_alpha() -> f64 {
    0.75
}

/// Retriever scoped to one corpus of the index
pub struct DocRetrieverTool {
    name: &'static str,
    intent: &'static str,
    description: &'static str,
    search: Arc<dyn DocumentSearch>,
}

impl DocRetrieverTool {
    /// Internal HR and welfare documents
    pub fn hr(search: Arc<dyn DocumentSearch>) -> Self {
        Self {
            name: "hr_doc_retriever",
            intent: "HR",
            description: "Search internal HR documents for questions about company personnel and welfare policies.",
            search,
        }
    }

    /// General-knowledge encyclopedia articles
    pub fn wiki(search: Arc<dyn DocumentSearch>) -> Self {
        Self {
            name: "wiki_doc_retriever",
            intent: "wiki",
            description: "Search Wikipedia articles for general-knowledge questions.",
            search,
        }
    }

    fn parse_args(input: Value) -> Result<RetrieverArgs, ToolError> {
        let args: RetrieverArgs =
            serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        if args.query.trim().is_empty() {
            return Err(ToolError::InvalidInput("query must not be empty".to_string()));
        }
        if args.topk == 0 {
            return Err(ToolError::InvalidInput("topk must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&args.alpha) {
            return Err(ToolError::InvalidInput(format!(
                "alpha must be within [0, 1], got {}",
                args.alpha
            )));
        }
        Ok(args)
    }
}

#[async_trait]
impl Tool for DocRetrieverTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> String {
        self.description.to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query", "topk", "alpha"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Query or keywords to search for."
                },
                "topk": {
                    "type": "integer",
                    "description": "The number of documents to retrieve."
                },
                "alpha": {
                    "type": "number",
                    "description": "Weight between keyword search and vector search."
                }
            }
        })
    }

    async fn run(&self, input: Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args = Self::parse_args(input)?;
        tracing::debug!(
            tool = %self.name,
            run_id = %ctx.run_id,
            topk = args.topk,
            "Retrieving documents"
        );

        tokio::select! {
            biased;

            () = ctx.cancel.cancelled() => Err(ToolError::Cancelled),

            result = self.search.search(self.intent, &args.query, args.topk, args.alpha) => {
                Ok(ToolOutput::Documents(result?))
            }
        }
    }
}
