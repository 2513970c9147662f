//! Events that drive phase transitions

use super::routing::Route;

/// Outcome of the work done in the current phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Orchestrator step finished and the routing policy decided
    Routed(Route),

    /// Tool round finished (whatever the per-call outcomes)
    ToolsExecuted,

    /// Answer stream ran to completion
    StreamExhausted,

    /// Anything that cannot be recovered locally
    Fault { message: String },
}
