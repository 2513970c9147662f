//! Finalize pseudo-tool
//!
//! Selecting this tool tells the orchestrator loop to stop retrieving and
//! generate the answer. Running it has no side effects.

use super::{Tool, ToolContext, ToolError, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Name the routing policy treats as the terminal action
pub const FINALIZE_TOOL: &str = "generate_answer";

pub struct GenerateAnswerTool;

#[async_trait]
impl Tool for GenerateAnswerTool {
    fn name(&self) -> &'static str {
        FINALIZE_TOOL
    }

    fn description(&self) -> String {
        "Call only when the transcript already holds enough background knowledge and retrieval results to answer, or when no other tool can provide useful information.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn run(&self, _input: Value, _ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::Text(String::new()))
    }
}
