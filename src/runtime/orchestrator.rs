//! Orchestrator step: ask the model for the next action

use crate::config::AgentConfig;
use crate::conversation::{ConversationState, Message};
use crate::llm::{LanguageModel, LlmError, LlmRequest, ToolChoice};
use crate::tools::ToolRegistry;

/// Result of one orchestrator invocation
#[derive(Debug)]
pub enum PlanOutcome {
    /// An Assistant message carrying the selected calls was appended
    Planned,
    /// Nothing was appended; the following empty round advances the counter
    Failed(LlmError),
}

impl PlanOutcome {
    pub fn is_planned(&self) -> bool {
        matches!(self, PlanOutcome::Planned)
    }
}

/// Request a tool selection over the full transcript.
///
/// Model failures are absorbed here and leave `num_tries` alone. The caller
/// routes a failed plan into an empty tool round, which counts it once.
pub async fn plan_next_action(
    state: &mut ConversationState,
    model: &dyn LanguageModel,
    tools: &ToolRegistry,
    config: &AgentConfig,
) -> PlanOutcome {
    let request = LlmRequest::new(&config.prompts.orchestrator, state.transcript())
        .with_tools(tools.definitions(), ToolChoice::Required);

    let result = match tokio::time::timeout(config.model_timeout, model.invoke(&request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::timeout(config.model_timeout)),
    };

    match result {
        Ok(response) => {
            let mut calls = response.tool_calls;
            if calls.len() != 1 {
                tracing::warn!(count = calls.len(), "Expected exactly one tool call");
            }
            for call in &mut calls {
                if call.id.is_empty() {
                    call.id = format!("call_{}", uuid::Uuid::new_v4().simple());
                }
            }
            tracing::debug!(
                tools = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "Orchestrator selected"
            );
            state.push(Message::assistant_with_calls(response.content, calls));
            PlanOutcome::Planned
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                kind = ?e.kind,
                num_tries = state.num_tries,
                "Orchestrator invocation failed"
            );
            PlanOutcome::Failed(e)
        }
    }
}
