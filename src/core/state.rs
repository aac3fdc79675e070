//! State behaviour hooks.
//!
//! A state is a unit of behaviour the engine invokes while a device sits in
//! it. States never see the engine; they only see the device context they are
//! handed on each call.

use std::time::Duration;

/// Lifecycle hooks for a single state of a device state machine.
///
/// The engine calls `in_state` once per tick for the current state and
/// `on_exit`/`on_entry` around every transition it applies. All hooks default
/// to no-ops, so a waypoint state implements nothing.
///
/// # Example
///
/// ```rust
/// use statesim::core::State;
/// use std::time::Duration;
///
/// struct Counter {
///     ticks: u32,
/// }
///
/// struct Warmup;
///
/// impl State<Counter> for Warmup {
///     fn in_state(&mut self, ctx: &mut Counter, _dt: Duration) {
///         ctx.ticks += 1;
///     }
/// }
///
/// let mut ctx = Counter { ticks: 0 };
/// let mut state = Warmup;
/// state.in_state(&mut ctx, Duration::from_secs(1));
/// assert_eq!(ctx.ticks, 1);
/// ```
pub trait State<C>: Send {
    /// Called when the engine switches into this state.
    ///
    /// `dt` is the duration of the tick in which the switch happened, or zero
    /// for the initial entry.
    fn on_entry(&mut self, _ctx: &mut C, _dt: Duration) {}

    /// Called once per tick while this is the current state.
    fn in_state(&mut self, _ctx: &mut C, _dt: Duration) {}

    /// Called when the engine switches away from this state.
    fn on_exit(&mut self, _ctx: &mut C, _dt: Duration) {}
}

/// State without behaviour, used for named waypoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Plain;

impl<C> State<C> for Plain {}
