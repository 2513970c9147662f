//! Orchestration state machine
//!
//! Pure phase transitions and routing, separated from the side-effecting
//! steps the run loop performs.

mod effect;
mod event;
pub mod routing;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use routing::{route, Route, RoutingPolicy};
pub use state::Phase;
pub use transition::{transition, TransitionError, TransitionResult};
