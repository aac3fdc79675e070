//! The tick-driven engine and its transition rules.
//!
//! # Key Concepts
//!
//! - **Transitions**: ordered `from -> to` rules with optional guards
//! - **State Machine**: runs the current state's hooks and applies the
//!   first rule that fires, chaining until the table is quiescent

pub(crate) mod engine;
mod transition;

pub use engine::StateMachine;
pub use transition::{TickError, Transition};
