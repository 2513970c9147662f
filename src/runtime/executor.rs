//! Run session: drives one run through the state machine

use super::answer::next_fragment;
use super::{
    execute_requests, execute_tool_round, generate_answer, plan_next_action, RunMetrics,
    RunOutcome, StreamEvent,
};
use crate::config::AgentConfig;
use crate::conversation::{ConversationState, Message};
use crate::llm::LanguageModel;
use crate::state_machine::{route, transition, Effect, Event, Phase, RoutingPolicy};
use crate::tools::{ToolContext, ToolRegistry};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const DISCONNECTED: &str = "client disconnected";

/// Single-flight owner of one run's conversation state
pub(super) struct RunSession<'a> {
    run_id: String,
    model: &'a dyn LanguageModel,
    tools: &'a ToolRegistry,
    config: &'a AgentConfig,
    policy: RoutingPolicy,
    state: ConversationState,
    phase: Phase,
    events: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
    /// The last plan appended nothing, so the next round has no requests
    plan_failed: bool,
    started: Instant,
    first_token: Option<Instant>,
}

impl<'a> RunSession<'a> {
    pub(super) fn new(
        model: &'a dyn LanguageModel,
        tools: &'a ToolRegistry,
        config: &'a AgentConfig,
        state: ConversationState,
        events: mpsc::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            model,
            tools,
            config,
            policy: RoutingPolicy::new(config.max_tool_rounds),
            state,
            phase: Phase::default(),
            events,
            cancel,
            plan_failed: false,
            started: Instant::now(),
            first_token: None,
        }
    }

    pub(super) async fn run(mut self) -> RunOutcome {
        tracing::info!(
            run_id = %self.run_id,
            model = %self.model.model_id(),
            "Starting run"
        );

        let mut next = Some(Effect::RequestPlan);
        while let Some(effect) = next.take() {
            let cancel = self.cancel.clone();
            let events = self.events.clone();

            let event = tokio::select! {
                biased;

                () = cancel.cancelled() => Event::Fault {
                    message: "run cancelled".to_string(),
                },

                () = events.closed() => {
                    cancel.cancel();
                    Event::Fault {
                        message: DISCONNECTED.to_string(),
                    }
                }

                event = self.perform(effect) => event,
            };

            match transition(&self.phase, event) {
                Ok(result) => {
                    tracing::debug!(
                        run_id = %self.run_id,
                        from = self.phase.name(),
                        to = result.new_phase.name(),
                        "Phase transition"
                    );
                    self.phase = result.new_phase;
                    next = result.effect;
                }
                Err(e) => {
                    tracing::error!(run_id = %self.run_id, error = %e, "Invalid transition");
                    self.phase = Phase::Failed {
                        message: e.to_string(),
                    };
                }
            }
        }

        self.finish().await
    }

    async fn perform(&mut self, effect: Effect) -> Event {
        match effect {
            Effect::RequestPlan => {
                let outcome =
                    plan_next_action(&mut self.state, self.model, self.tools, self.config).await;
                self.plan_failed = !outcome.is_planned();
                let last = if self.plan_failed {
                    None
                } else {
                    self.state.last_message()
                };
                Event::Routed(route(last, self.state.num_tries, &self.policy))
            }
            Effect::ExecuteTools => {
                let ctx = ToolContext::new(self.cancel.clone(), self.run_id.clone());
                let policy = self.config.tool_failure_policy;
                if std::mem::take(&mut self.plan_failed) {
                    execute_requests(&mut self.state, &[], self.tools, &ctx, policy).await;
                } else {
                    execute_tool_round(&mut self.state, self.tools, &ctx, policy).await;
                }
                Event::ToolsExecuted
            }
            Effect::GenerateAnswer => match self.stream_answer().await {
                Ok(()) => Event::StreamExhausted,
                Err(message) => Event::Fault { message },
            },
        }
    }

    /// Relay answer fragments as they arrive, then record the full answer
    async fn stream_answer(&mut self) -> Result<(), String> {
        let limit = self.config.model_timeout;
        let mut stream = generate_answer(&self.state, self.model, self.config)
            .await
            .map_err(|e| e.to_string())?;

        let mut answer = String::new();
        while let Some(fragment) = next_fragment(&mut stream, limit).await {
            let fragment = fragment.map_err(|e| e.to_string())?;
            if fragment.is_empty() {
                continue;
            }
            answer.push_str(&fragment);
            self.events
                .send(StreamEvent::Token(fragment))
                .await
                .map_err(|_| DISCONNECTED.to_string())?;
            self.first_token.get_or_insert_with(Instant::now);
        }

        tracing::info!(run_id = %self.run_id, chars = answer.len(), "Answer streamed");
        self.state.push(Message::assistant(answer));
        Ok(())
    }

    async fn finish(self) -> RunOutcome {
        // End-to-end latency is only measured once the answer stream is exhausted
        let metrics = RunMetrics {
            ttft: self.first_token.map(|t| t.duration_since(self.started)),
            e2el: (self.phase == Phase::Done).then(|| self.started.elapsed()),
        };

        if let Phase::Failed { message } = &self.phase {
            tracing::error!(run_id = %self.run_id, error = %message, "Run failed");
            if self
                .events
                .send(StreamEvent::Error(message.clone()))
                .await
                .is_err()
            {
                tracing::debug!(run_id = %self.run_id, "Receiver dropped before error event");
            }
        } else {
            tracing::info!(
                run_id = %self.run_id,
                num_tries = self.state.num_tries,
                ttft_ms = ?metrics.ttft.map(|d| d.as_millis()),
                "Run finished"
            );
        }

        if self
            .events
            .send(StreamEvent::Finished(metrics))
            .await
            .is_err()
        {
            tracing::debug!(run_id = %self.run_id, "Receiver dropped before finished event");
        }

        RunOutcome {
            run_id: self.run_id,
            phase: self.phase,
            state: self.state,
            metrics,
        }
    }
}
