//! Reusable state behaviours.
//!
//! - [`TimedAction`]: keeps a device busy for a fixed time, with a side
//!   effect applied on exit
//! - [`Decay`]: attributes drift continuously while in the state
//! - [`DecayWithTimeout`]: decay that kills the device after a deadline
//!
//! Each variant states the context capabilities it needs through the traits
//! in [`context`].

pub mod context;
mod decay;
mod timed_action;

pub use context::{Accessor, ActionSlot, Attributes, Mortal};
pub use decay::{Decay, DecayConfig, DecayWithTimeout, ATTRIBUTE_MAX, ATTRIBUTE_MIN};
pub use timed_action::{ActionFn, TimedAction};
