//! Transition rules and tick errors.

use crate::core::Guard;

/// Errors that abort a tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error(
        "More than {limit} transitions in one tick (stopped in '{state}'); \
         the transition table has a cycle of instantly satisfied guards"
    )]
    TransitionOverflow { state: String, limit: usize },
}

/// A guarded rule moving a machine from one named state to another.
///
/// Rules without a guard always fire when the machine is in their source
/// state.
///
/// # Example
///
/// ```rust
/// use statesim::machine::Transition;
///
/// struct Door {
///     open: bool,
/// }
///
/// let close = Transition::new("open", "closed").when(|d: &Door| !d.open);
///
/// assert!(close.can_execute("open", &Door { open: false }));
/// assert!(!close.can_execute("open", &Door { open: true }));
/// assert!(!close.can_execute("closed", &Door { open: false }));
/// ```
pub struct Transition<C> {
    pub from: String,
    pub to: String,
    pub guard: Option<Guard<C>>,
}

impl<C> Transition<C> {
    /// Unconditional rule from `from` to `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            guard: None,
        }
    }

    /// Attach a guard predicate, replacing any previous one.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Attach a prebuilt guard.
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Check the guard alone, ignoring the source state (pure).
    pub fn guard_allows(&self, ctx: &C) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(ctx))
    }

    /// Check if this transition can execute from the current state (pure)
    pub fn can_execute(&self, current: &str, ctx: &C) -> bool {
        if current != self.from {
            return false;
        }

        self.guard_allows(ctx)
    }
}

impl<C> std::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Level(f64);

    #[test]
    fn can_execute_matches_from_state() {
        let transition: Transition<Level> = Transition::new("idle", "moving");

        assert!(transition.can_execute("idle", &Level(0.0)));
        assert!(!transition.can_execute("moving", &Level(0.0)));
    }

    #[test]
    fn can_execute_respects_guard() {
        let transition = Transition::new("idle", "moving").when(|l: &Level| l.0 > 1.0);

        assert!(transition.can_execute("idle", &Level(2.0)));
        assert!(!transition.can_execute("idle", &Level(0.5)));
    }

    #[test]
    fn prebuilt_guard_is_used() {
        let transition = Transition::new("a", "b").guard(Guard::new(|l: &Level| l.0 < 0.0));

        assert!(!transition.guard_allows(&Level(1.0)));
        assert!(transition.guard_allows(&Level(-1.0)));
    }

    #[test]
    fn overflow_message_names_state() {
        let error = TickError::TransitionOverflow {
            state: "ping".to_string(),
            limit: 4,
        };

        assert!(error.to_string().contains("'ping'"));
        assert!(error.to_string().starts_with("More than 4 transitions"));
    }
}
