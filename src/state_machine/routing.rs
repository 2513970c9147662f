//! Routing policy: tools or answer
//!
//! Pure decision taken after every orchestrator step. The round bound is the
//! only termination guarantee of the orchestration cycle.

use crate::config::DEFAULT_MAX_TOOL_ROUNDS;
use crate::conversation::Message;
use crate::tools::FINALIZE_TOOL;

/// Where the run goes after the orchestrator step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ExecuteTools,
    Finalize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    /// Once this many tool rounds have run, the answer is forced
    pub max_tool_rounds: u32,
    /// Tool name that selects the terminal action
    pub finalize_tool: String,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOOL_ROUNDS)
    }
}

impl RoutingPolicy {
    pub fn new(max_tool_rounds: u32) -> Self {
        Self {
            max_tool_rounds,
            finalize_tool: FINALIZE_TOOL.to_string(),
        }
    }
}

/// Decide the next step from the latest message and the round counter.
///
/// A finalize call wins even when other calls share the message.
pub fn route(last: Option<&Message>, num_tries: u32, policy: &RoutingPolicy) -> Route {
    if num_tries >= policy.max_tool_rounds {
        return Route::Finalize;
    }

    match last {
        Some(Message::Assistant { tool_calls, .. })
            if tool_calls.iter().any(|c| c.name == policy.finalize_tool) =>
        {
            Route::Finalize
        }
        _ => Route::ExecuteTools,
    }
}
