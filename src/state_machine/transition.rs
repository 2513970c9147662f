//! Pure phase transition function
//!
//! Given the same phase and event it always produces the same result, with
//! no I/O. The run loop performs the returned effect and feeds the outcome
//! back in as the next event.

use super::{Effect, Event, Phase, Route};
use thiserror::Error;

/// Result of a phase transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_phase: Phase,
    /// Next unit of work; `None` once the phase is terminal
    pub effect: Option<Effect>,
}

impl TransitionResult {
    pub fn new(phase: Phase) -> Self {
        Self {
            new_phase: phase,
            effect: None,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Run already finished ({0})")]
    Terminal(&'static str),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(phase: &Phase, event: Event) -> Result<TransitionResult, TransitionError> {
    match (phase, event) {
        (phase, _) if phase.is_terminal() => Err(TransitionError::Terminal(phase.name())),

        // Any failure escaping a step ends the run
        (_, Event::Fault { message }) => Ok(TransitionResult::new(Phase::Failed { message })),

        (Phase::Orchestrating, Event::Routed(Route::Finalize)) => {
            Ok(TransitionResult::new(Phase::Generating).with_effect(Effect::GenerateAnswer))
        }

        (Phase::Orchestrating, Event::Routed(Route::ExecuteTools)) => {
            Ok(TransitionResult::new(Phase::ExecutingTools).with_effect(Effect::ExecuteTools))
        }

        (Phase::ExecutingTools, Event::ToolsExecuted) => {
            Ok(TransitionResult::new(Phase::Orchestrating).with_effect(Effect::RequestPlan))
        }

        (Phase::Generating, Event::StreamExhausted) => Ok(TransitionResult::new(Phase::Done)),

        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {phase:?} with event {event:?}"
        ))),
    }
}
