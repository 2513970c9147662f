//! Tool executor: one round of tool calls

use crate::config::ToolFailurePolicy;
use crate::conversation::{ConversationState, Message, ToolCallRequest};
use crate::tools::{ToolContext, ToolError, ToolOutput, ToolRegistry};
use futures::future::join_all;
use thiserror::Error;

/// Why a single call produced no output
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("unknown tool: {0}")]
    Unroutable(String),
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Run the calls selected by the latest Assistant message.
///
/// Anything other than an Assistant message as the last entry means an
/// empty round, which still counts toward the bound.
pub async fn execute_tool_round(
    state: &mut ConversationState,
    registry: &ToolRegistry,
    ctx: &ToolContext,
    policy: ToolFailurePolicy,
) -> usize {
    let requests = match state.last_message() {
        Some(msg @ Message::Assistant { .. }) => msg.tool_calls().to_vec(),
        _ => Vec::new(),
    };
    execute_requests(state, &requests, registry, ctx, policy).await
}

/// Run `requests` concurrently and append their results in request order.
///
/// Returns the number of ToolResult messages appended.
pub async fn execute_requests(
    state: &mut ConversationState,
    requests: &[ToolCallRequest],
    registry: &ToolRegistry,
    ctx: &ToolContext,
    policy: ToolFailurePolicy,
) -> usize {
    state.num_tries += 1;

    let outcomes = join_all(
        requests
            .iter()
            .map(|request| invoke(request, registry, ctx.clone())),
    )
    .await;

    let mut results = Vec::with_capacity(requests.len());
    for (request, outcome) in requests.iter().zip(outcomes) {
        match outcome {
            Ok(output) => {
                results.push(Message::tool_result(&request.id, output.to_payload()));
                state.tool_results.insert(request.name.clone(), output);
            }
            Err(e) => {
                match &e {
                    ToolCallError::Unroutable(name) => {
                        tracing::warn!(run_id = %ctx.run_id, tool = %name, "Skipping unroutable tool call");
                    }
                    ToolCallError::Tool(err) => {
                        tracing::error!(
                            run_id = %ctx.run_id,
                            tool = %request.name,
                            error = %err,
                            "Tool invocation failed"
                        );
                    }
                }
                if policy == ToolFailurePolicy::Report {
                    results.push(Message::tool_result(&request.id, format!("error: {e}")));
                }
            }
        }
    }

    let appended = results.len();
    tracing::info!(
        run_id = %ctx.run_id,
        requested = requests.len(),
        appended,
        num_tries = state.num_tries,
        "Tool round complete"
    );
    state.extend(results);
    appended
}

async fn invoke(
    request: &ToolCallRequest,
    registry: &ToolRegistry,
    ctx: ToolContext,
) -> Result<ToolOutput, ToolCallError> {
    let tool = registry
        .resolve(&request.name)
        .ok_or_else(|| ToolCallError::Unroutable(request.name.clone()))?;
    Ok(tool.run(request.arguments.clone(), ctx).await?)
}
