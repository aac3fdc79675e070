//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over the device context that decide
//! whether a transition may fire. They never mutate the context.

/// Pure predicate that determines if a transition can execute.
///
/// Guards are evaluated against the device context on every transition scan,
/// so they must be deterministic and free of side effects.
///
/// # Example
///
/// ```rust
/// use statesim::core::Guard;
///
/// struct Tank {
///     level: f64,
/// }
///
/// let overflowing = Guard::new(|tank: &Tank| tank.level > 95.0);
///
/// assert!(overflowing.check(&Tank { level: 99.0 }));
/// assert!(!overflowing.check(&Tank { level: 10.0 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against the current context.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }
}

impl<C> std::fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}
