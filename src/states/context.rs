//! Capabilities the reusable state variants need from a device context.
//!
//! Each variant asks only for what it touches, so a context implements just
//! the traits of the states it is wired with.

/// Pending-action slot of a device.
pub trait ActionSlot {
    /// Drop the pending action, signalling that it has completed.
    fn clear_action(&mut self);
}

/// Terminal notification used by states that can kill a device.
pub trait Mortal {
    fn set_dead(&mut self);
}

/// Getter/setter pair for one numeric attribute of a context.
///
/// Resolved once when a state is built, so ticking never looks attributes
/// up by name.
pub struct Accessor<C> {
    pub get: fn(&C) -> f64,
    pub set: fn(&mut C, f64),
}

impl<C> Clone for Accessor<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Accessor<C> {}

impl<C> std::fmt::Debug for Accessor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// Named numeric attributes that decay states may read and write.
pub trait Attributes: Sized {
    /// Look up the accessor for `name`, or `None` if the context has no
    /// such attribute.
    fn accessor(name: &str) -> Option<Accessor<Self>>;

    /// Advance the context's age by `delta`.
    fn add_age(&mut self, delta: f64);
}
