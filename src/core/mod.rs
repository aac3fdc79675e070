//! Core state machine types.
//!
//! This module contains the device-independent building blocks:
//! - State behaviour via the `State` trait
//! - Guard predicates for transition control
//! - Bounded history tracking

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{Plain, State};
