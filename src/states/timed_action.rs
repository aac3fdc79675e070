//! Discrete action with a fixed duration and a deferred side effect.

use crate::core::State;
use crate::states::context::ActionSlot;
use std::time::Duration;

/// Side effect applied to the context when a timed action ends.
pub type ActionFn<C> = Box<dyn Fn(&mut C) + Send + Sync>;

/// State that keeps a device busy for `duration`, then lets it go.
///
/// Entering resets the timer. Once the accumulated in-state time reaches the
/// duration the context's pending action is cleared, which is what the
/// outgoing transition guards on. The action itself runs on exit, so its
/// effect lands exactly once, when the state is left.
///
/// # Example
///
/// ```rust
/// use statesim::core::State;
/// use statesim::states::{ActionSlot, TimedAction};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Kettle {
///     pending: bool,
///     boiled: u32,
/// }
///
/// impl ActionSlot for Kettle {
///     fn clear_action(&mut self) {
///         self.pending = false;
///     }
/// }
///
/// let mut kettle = Kettle { pending: true, boiled: 0 };
/// let mut boil = TimedAction::new(Duration::from_secs(3), |k: &mut Kettle| k.boiled += 1);
///
/// boil.on_entry(&mut kettle, Duration::ZERO);
/// boil.in_state(&mut kettle, Duration::from_secs(3));
/// assert!(!kettle.pending);
/// assert_eq!(kettle.boiled, 0);
///
/// boil.on_exit(&mut kettle, Duration::ZERO);
/// assert_eq!(kettle.boiled, 1);
/// ```
pub struct TimedAction<C> {
    duration: Duration,
    action: ActionFn<C>,
    in_state_for: Duration,
}

impl<C> TimedAction<C> {
    pub fn new<F>(duration: Duration, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Self {
            duration,
            action: Box::new(action),
            in_state_for: Duration::ZERO,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time spent in the state since the last entry.
    pub fn elapsed(&self) -> Duration {
        self.in_state_for
    }
}

impl<C: ActionSlot> State<C> for TimedAction<C> {
    fn on_entry(&mut self, _ctx: &mut C, _dt: Duration) {
        self.in_state_for = Duration::ZERO;
    }

    fn in_state(&mut self, ctx: &mut C, dt: Duration) {
        self.in_state_for = self.in_state_for.saturating_add(dt);

        if self.in_state_for >= self.duration {
            ctx.clear_action();
        }
    }

    fn on_exit(&mut self, ctx: &mut C, _dt: Duration) {
        (self.action)(ctx);
    }
}

impl<C> std::fmt::Debug for TimedAction<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedAction")
            .field("duration", &self.duration)
            .field("in_state_for", &self.in_state_for)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Worker {
        pending: Option<&'static str>,
        cleared: u32,
        done: u32,
    }

    impl ActionSlot for Worker {
        fn clear_action(&mut self) {
            self.pending = None;
            self.cleared += 1;
        }
    }

    fn job() -> TimedAction<Worker> {
        TimedAction::new(Duration::from_secs(5), |w: &mut Worker| w.done += 1)
    }

    #[test]
    fn action_is_not_cleared_before_duration() {
        let mut worker = Worker {
            pending: Some("eat"),
            ..Worker::default()
        };
        let mut state = job();

        state.on_entry(&mut worker, Duration::ZERO);
        for _ in 0..4 {
            state.in_state(&mut worker, Duration::from_secs(1));
        }

        assert_eq!(worker.pending, Some("eat"));
        assert_eq!(state.elapsed(), Duration::from_secs(4));
    }

    #[test]
    fn action_is_cleared_once_duration_reached() {
        let mut worker = Worker {
            pending: Some("eat"),
            ..Worker::default()
        };
        let mut state = job();

        state.on_entry(&mut worker, Duration::ZERO);
        for _ in 0..5 {
            state.in_state(&mut worker, Duration::from_secs(1));
        }

        assert_eq!(worker.pending, None);
        assert_eq!(worker.done, 0);
    }

    #[test]
    fn side_effect_fires_on_exit_only() {
        let mut worker = Worker::default();
        let mut state = job();

        state.on_entry(&mut worker, Duration::ZERO);
        state.in_state(&mut worker, Duration::from_secs(10));
        assert_eq!(worker.done, 0);

        state.on_exit(&mut worker, Duration::ZERO);
        assert_eq!(worker.done, 1);
    }

    #[test]
    fn entry_resets_timer() {
        let mut worker = Worker::default();
        let mut state = job();

        state.on_entry(&mut worker, Duration::ZERO);
        state.in_state(&mut worker, Duration::from_secs(3));
        state.on_entry(&mut worker, Duration::ZERO);

        assert_eq!(state.elapsed(), Duration::ZERO);
    }

    #[test]
    fn timer_saturates_on_huge_dt() {
        let mut worker = Worker {
            pending: Some("eat"),
            ..Worker::default()
        };
        let mut state = job();

        state.on_entry(&mut worker, Duration::ZERO);
        state.in_state(&mut worker, Duration::MAX);
        state.in_state(&mut worker, Duration::MAX);

        assert_eq!(state.elapsed(), Duration::MAX);
        assert_eq!(worker.pending, None);
    }
}
