//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::conversation::{format_history, Message, ToolCallRequest};
use crate::tools::FINALIZE_TOOL;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_tool_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("hr_doc_retriever".to_string()),
        Just("wiki_doc_retriever".to_string()),
        Just(FINALIZE_TOOL.to_string()),
        "[a-z_]{1,12}",
    ]
}

fn arb_tool_call() -> impl Strategy<Value = ToolCallRequest> {
    ("[a-z0-9]{8}", arb_tool_name())
        .prop_map(|(id, name)| ToolCallRequest::new(id, name, json!({"query": "q"})))
}

fn arb_non_finalize_call() -> impl Strategy<Value = ToolCallRequest> {
    arb_tool_call().prop_filter("not finalize", |c| c.name != FINALIZE_TOOL)
}

// Single-line content so each message maps to exactly one transcript line
fn arb_content() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,?]{0,40}"
}

fn arb_message() -> impl Strategy<Value = Message> {
    prop_oneof![
        arb_content().prop_map(Message::system),
        arb_content().prop_map(Message::user),
        (arb_content(), proptest::collection::vec(arb_tool_call(), 0..3))
            .prop_map(|(content, calls)| Message::assistant_with_calls(content, calls)),
        ("[a-z0-9]{8}", arb_content()).prop_map(|(id, content)| Message::tool_result(id, content)),
        Just(Message::Unknown),
    ]
}

fn arb_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Orchestrating),
        Just(Phase::ExecutingTools),
        Just(Phase::Generating),
        Just(Phase::Done),
        "[a-zA-Z ]{1,30}".prop_map(|message| Phase::Failed { message }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Routed(Route::ExecuteTools)),
        Just(Event::Routed(Route::Finalize)),
        Just(Event::ToolsExecuted),
        Just(Event::StreamExhausted),
        "[a-zA-Z ]{1,30}".prop_map(|message| Event::Fault { message }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_exhausted_rounds_always_finalize(
        last in proptest::option::of(arb_message()),
        extra in 0u32..100,
    ) {
        let policy = RoutingPolicy::default();
        let route = route(last.as_ref(), policy.max_tool_rounds + extra, &policy);
        prop_assert_eq!(route, Route::Finalize);
    }

    #[test]
    fn prop_tool_selection_with_budget_routes_to_tools(
        calls in proptest::collection::vec(arb_non_finalize_call(), 0..4),
        num_tries in 0u32..3,
    ) {
        let msg = Message::assistant_with_calls("", calls);
        prop_assert_eq!(
            route(Some(&msg), num_tries, &RoutingPolicy::default()),
            Route::ExecuteTools
        );
    }

    #[test]
    fn prop_terminal_phases_accept_nothing(event in arb_event()) {
        prop_assert!(transition(&Phase::Done, event.clone()).is_err());
        let failed = Phase::Failed { message: "x".to_string() };
        prop_assert!(transition(&failed, event).is_err());
    }

    #[test]
    fn prop_fault_always_fails(phase in arb_phase(), message in "[a-z ]{1,20}") {
        let result = transition(&phase, Event::Fault { message: message.clone() });
        if phase.is_terminal() {
            prop_assert!(result.is_err());
        } else {
            let result = result.unwrap();
            prop_assert_eq!(result.new_phase, Phase::Failed { message });
            prop_assert_eq!(result.effect, None);
        }
    }

    #[test]
    fn prop_non_terminal_success_has_effect(phase in arb_phase(), event in arb_event()) {
        if let Ok(result) = transition(&phase, event) {
            prop_assert_eq!(result.effect.is_none(), result.new_phase.is_terminal());
        }
    }

    /// The orchestration cycle reaches `Generating` within `max + 1`
    /// orchestrator invocations no matter what the model selects.
    #[test]
    fn prop_cycle_terminates(
        selections in proptest::collection::vec(
            proptest::collection::vec(arb_tool_call(), 0..3),
            16,
        ),
        max_tool_rounds in 0u32..6,
    ) {
        let policy = RoutingPolicy::new(max_tool_rounds);
        let mut phase = Phase::Orchestrating;
        let mut num_tries = 0u32;
        let mut plans = 0u32;
        let mut selections = selections.into_iter();

        while phase != Phase::Generating {
            prop_assert!(plans <= max_tool_rounds, "exceeded bound");
            let event = match phase {
                Phase::Orchestrating => {
                    plans += 1;
                    let calls = selections.next().unwrap_or_default();
                    let msg = Message::assistant_with_calls("", calls);
                    Event::Routed(route(Some(&msg), num_tries, &policy))
                }
                Phase::ExecutingTools => {
                    num_tries += 1;
                    Event::ToolsExecuted
                }
                _ => unreachable!(),
            };
            phase = transition(&phase, event).unwrap().new_phase;
        }
        prop_assert!(plans <= max_tool_rounds + 1);
    }

    #[test]
    fn prop_history_one_line_per_known_message(
        messages in proptest::collection::vec(arb_message(), 0..12),
    ) {
        let transcript = format_history(&messages);
        let known: Vec<&Message> = messages
            .iter()
            .filter(|m| !matches!(m, Message::Unknown))
            .collect();
        let lines: Vec<&str> = transcript.lines().collect();
        prop_assert_eq!(lines.len(), known.len());

        for (line, msg) in lines.iter().zip(known) {
            let prefix = match msg {
                Message::System { .. } => "System: ",
                Message::User { .. } => "User: ",
                Message::Assistant { .. } => "Assistant: ",
                Message::ToolResult { .. } => "Tool use: ",
                Message::Unknown => unreachable!(),
            };
            prop_assert!(line.starts_with(prefix));
        }
    }
}
