//! Effects produced by phase transitions

/// Work the run loop must perform after entering a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Invoke the orchestrator step
    RequestPlan,

    /// Execute the latest tool calls
    ExecuteTools,

    /// Stream the final answer
    GenerateAnswer,
}
