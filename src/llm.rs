//! Language model abstraction
//!
//! The core only needs two capabilities from a model: a non-streaming
//! invocation that may return structured tool calls, and a streamed
//! free-text completion. Provider adapters live outside this crate.

mod error;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use types::*;

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// Common interface for language model backends
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-shot completion. Used by the orchestrator with
    /// `ToolChoice::Required`.
    async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Streamed free-text completion
    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        (**self).invoke(request).await
    }

    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError> {
        (**self).stream(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logging wrapper for language models
pub struct LoggingModel {
    inner: Arc<dyn LanguageModel>,
    model_id: String,
}

impl LoggingModel {
    pub fn new(inner: Arc<dyn LanguageModel>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LanguageModel for LoggingModel {
    async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.invoke(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    tool_calls = response.tool_calls.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError> {
        let start = std::time::Instant::now();
        match self.inner.stream(request).await {
            Ok(stream) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %start.elapsed().as_millis(),
                    "LLM stream opened"
                );
                let model = self.model_id.clone();
                Ok(stream
                    .inspect(move |item| {
                        if let Err(e) = item {
                            tracing::error!(model = %model, error = %e.message, "LLM stream failed");
                        }
                    })
                    .boxed())
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %start.elapsed().as_millis(),
                    error = %e.message,
                    "LLM stream could not be opened"
                );
                Err(e)
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
