//! Mock implementations for testing
//!
//! These mocks enable run-loop testing without a real model or index.

use super::StreamEvent;
use crate::llm::{LanguageModel, LlmError, LlmRequest, LlmResponse, TextStream};
use crate::search::{Document, DocumentSearch, SearchError};
use crate::tools::{Tool, ToolContext, ToolError, ToolOutput};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

type StreamScript = Result<Vec<Result<String, LlmError>>, LlmError>;

// ============================================================================
// Mock Language Model
// ============================================================================

/// Model that replays queued responses and streams
pub struct ScriptedModel {
    model_id: String,
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    /// Record of all requests made, invoke and stream alike
    requests: Mutex<Vec<LlmRequest>>,
    invoke_delay: Option<Duration>,
    fragment_delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            responses: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            invoke_delay: None,
            fragment_delay: None,
        }
    }

    #[must_use]
    pub fn with_invoke_delay(mut self, delay: Duration) -> Self {
        self.invoke_delay = Some(delay);
        self
    }

    /// Sleep before every streamed fragment
    #[must_use]
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = Some(delay);
        self
    }

    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Queue a stream that yields `fragments` and then ends
    pub fn queue_stream<I, S>(&self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = fragments.into_iter().map(|f| Ok(f.into())).collect();
        self.queue_stream_items(items);
    }

    /// Queue a stream with explicit items, including mid-stream errors
    pub fn queue_stream_items(&self, items: Vec<Result<String, LlmError>>) {
        self.streams.lock().unwrap().push_back(Ok(items));
    }

    /// Queue a stream that fails to open
    pub fn queue_stream_error(&self, error: LlmError) {
        self.streams.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn invoke(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.invoke_delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    async fn stream(&self, request: &LlmRequest) -> Result<TextStream, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let items = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock stream queued")))?;

        let delay = self.fragment_delay;
        Ok(futures::stream::iter(items)
            .then(move |item| async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                item
            })
            .boxed())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock Tools
// ============================================================================

/// Tool that always returns the same output
pub struct StaticTool {
    name: String,
    output: ToolOutput,
}

impl StaticTool {
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: ToolOutput::Text(text.into()),
        }
    }

    pub fn documents(name: impl Into<String>, docs: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            output: ToolOutput::Documents(docs),
        }
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Static {}", self.name)
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn run(&self, _input: Value, _ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        Ok(self.output.clone())
    }
}

/// Tool that answers after a delay
pub struct SlowTool {
    name: String,
    text: String,
    delay: Duration,
}

impl SlowTool {
    pub fn new(name: impl Into<String>, text: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            delay,
        }
    }
}

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Slow {}", self.name)
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn run(&self, _input: Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        tokio::select! {
            () = ctx.cancel.cancelled() => Err(ToolError::Cancelled),
            () = tokio::time::sleep(self.delay) => Ok(ToolOutput::Text(self.text.clone())),
        }
    }
}

/// Tool whose backend is always down
pub struct FailingTool {
    name: String,
}

impl FailingTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Failing {}", self.name)
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn run(&self, _input: Value, _ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        Err(ToolError::Search(SearchError::Status {
            status: 503,
            body: "index unavailable".to_string(),
        }))
    }
}

// ============================================================================
// Mock Document Search
// ============================================================================

/// In-memory search returning fixed documents per intent
#[derive(Default)]
pub struct StaticSearch {
    documents: HashMap<String, Vec<Document>>,
    /// (intent, query, topk) per call
    queries: Mutex<Vec<(String, String, usize)>>,
}

impl StaticSearch {
    #[must_use]
    pub fn with_documents(mut self, intent: impl Into<String>, docs: Vec<Document>) -> Self {
        self.documents.insert(intent.into(), docs);
        self
    }

    pub fn recorded_queries(&self) -> Vec<(String, String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSearch for StaticSearch {
    async fn search(
        &self,
        intent: &str,
        query: &str,
        topk: usize,
        _alpha: f64,
    ) -> Result<Vec<Document>, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((intent.to_string(), query.to_string(), topk));
        Ok(self
            .documents
            .get(intent)
            .map(|docs| docs.iter().take(topk).cloned().collect())
            .unwrap_or_default())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Drain a run's channel once the producer is gone
pub async fn collect_events(mut rx: mpsc::Receiver<StreamEvent>) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}
