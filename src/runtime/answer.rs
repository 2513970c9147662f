//! Answer generator

use crate::config::AgentConfig;
use crate::conversation::ConversationState;
use crate::llm::{LanguageModel, LlmError, LlmRequest, TextStream};
use futures::StreamExt;
use std::time::Duration;

/// Open a streamed answer over the full transcript.
///
/// The returned stream is lazy and can only be consumed once.
pub async fn generate_answer(
    state: &ConversationState,
    model: &dyn LanguageModel,
    config: &AgentConfig,
) -> Result<TextStream, LlmError> {
    let request = LlmRequest::new(&config.prompts.answer, state.transcript());
    match tokio::time::timeout(config.model_timeout, model.stream(&request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::timeout(config.model_timeout)),
    }
}

/// Next fragment, or a timeout error if none arrives within `limit`
pub(super) async fn next_fragment(
    stream: &mut TextStream,
    limit: Duration,
) -> Option<Result<String, LlmError>> {
    match tokio::time::timeout(limit, stream.next()).await {
        Ok(item) => item,
        Err(_) => Some(Err(LlmError::timeout(limit))),
    }
}
