//! Omni agent: tool-routing question answering over SSE
//!
//! A run seeds a conversation with the user's query, lets the model pick
//! retrieval tools for a bounded number of rounds, then streams the final
//! answer token by token.

pub mod api;
pub mod config;
pub mod conversation;
pub mod ingest;
pub mod llm;
pub mod runtime;
pub mod search;
pub mod state_machine;
pub mod system_prompt;
pub mod tools;
