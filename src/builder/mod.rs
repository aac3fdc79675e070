//! Builder API for state machine construction.
//!
//! This module provides a fluent builder and the `transitions!` macro for
//! wiring state tables with minimal boilerplate, plus the validation that
//! rejects a bad table before it ever ticks.

pub mod error;
pub mod machine;
pub mod macros;
pub(crate) mod validate;

pub use error::{BuildError, ConfigIssue};
pub use machine::StateMachineBuilder;
