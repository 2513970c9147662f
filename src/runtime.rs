//! Runtime for executing runs
//!
//! A run takes one user query through the orchestration cycle and streams
//! the answer back as [`StreamEvent`]s over a per-run channel.

mod answer;
mod executor;
mod orchestrator;
mod tool_round;

#[cfg(test)]
pub mod testing;

pub use answer::generate_answer;
pub use orchestrator::{plan_next_action, PlanOutcome};
pub use tool_round::{execute_requests, execute_tool_round, ToolCallError};

use crate::config::AgentConfig;
use crate::conversation::ConversationState;
use crate::llm::LanguageModel;
use crate::state_machine::Phase;
use crate::tools::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use executor::RunSession;

/// Buffered events per run before the producer waits on the consumer
const EVENT_BUFFER: usize = 64;

/// Events sent to the caller of a run
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// One answer fragment
    Token(String),
    /// The run failed; always followed by `Finished`
    Error(String),
    /// Terminal event, exactly once per run
    Finished(RunMetrics),
}

impl StreamEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::Token(_) => "stream",
            StreamEvent::Error(_) => "error",
            StreamEvent::Finished(_) => "finished",
        }
    }

    /// JSON payload carried in the `data:` field
    pub fn payload(&self) -> Value {
        match self {
            StreamEvent::Token(data) | StreamEvent::Error(data) => json!({ "data": data }),
            StreamEvent::Finished(metrics) => metrics.to_json(),
        }
    }

    /// Full wire frame, for transports that write raw bytes
    pub fn to_sse_frame(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event_type(), self.payload())
    }
}

/// Latency measurements for one run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunMetrics {
    /// Run start to first emitted token
    pub ttft: Option<Duration>,
    /// Run start to answer stream exhaustion; absent when the run failed
    pub e2el: Option<Duration>,
}

impl RunMetrics {
    /// `{"status": "done", "ttft": secs, "e2el": secs}`; unmeasured fields are omitted
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("status".to_string(), json!("done"));
        if let Some(ttft) = self.ttft {
            map.insert("ttft".to_string(), json!(ttft.as_secs_f64()));
        }
        if let Some(e2el) = self.e2el {
            map.insert("e2el".to_string(), json!(e2el.as_secs_f64()));
        }
        Value::Object(map)
    }
}

/// Final state of a run, returned when it is driven inline
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: String,
    pub phase: Phase,
    pub state: ConversationState,
    pub metrics: RunMetrics,
}

/// Entry point for runs
///
/// Holds the collaborators shared by every run. Each run gets its own
/// conversation state, channel and cancellation token.
#[derive(Clone)]
pub struct RunLoop {
    model: Arc<dyn LanguageModel>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl RunLoop {
    pub fn new(model: Arc<dyn LanguageModel>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            model,
            tools,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Start a run in the background and return its event stream.
    ///
    /// Dropping the stream cancels the run.
    pub fn submit_query(&self, query: impl Into<String>) -> ReceiverStream<StreamEvent> {
        self.submit_query_with_cancel(query, CancellationToken::new())
    }

    pub fn submit_query_with_cancel(
        &self,
        query: impl Into<String>,
        cancel: CancellationToken,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let this = self.clone();
        let query = query.into();
        tokio::spawn(async move {
            this.run_with_cancel(query, tx, cancel).await;
        });
        ReceiverStream::new(rx)
    }

    /// Drive a run to completion on the current task
    pub async fn run(&self, query: impl Into<String>, events: mpsc::Sender<StreamEvent>) -> RunOutcome {
        self.run_with_cancel(query, events, CancellationToken::new())
            .await
    }

    pub async fn run_with_cancel(
        &self,
        query: impl Into<String>,
        events: mpsc::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> RunOutcome {
        RunSession::new(
            self.model.as_ref(),
            &self.tools,
            &self.config,
            ConversationState::seeded(query),
            events,
            cancel,
        )
        .run()
        .await
    }
}
