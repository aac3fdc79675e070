//! Devices: a state machine bound to the context it drives.

use crate::machine::{StateMachine, TickError};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::Duration;

/// Anything a simulation can advance.
pub trait Device: Send {
    /// Advance the device by `dt` of simulated time.
    fn process(&mut self, dt: Duration) -> Result<(), TickError>;

    /// Externally visible state of the device.
    fn state(&self) -> &str;
}

/// A state machine together with the context its states and guards act on.
///
/// # Example
///
/// ```rust
/// use statesim::builder::StateMachineBuilder;
/// use statesim::core::Plain;
/// use statesim::device::SimulatedDevice;
/// use statesim::machine::Transition;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Relay {
///     closed: bool,
/// }
///
/// let machine = StateMachineBuilder::new()
///     .initial("open")
///     .state("open", Plain)
///     .state("closed", Plain)
///     .transition(Transition::new("open", "closed").when(|r: &Relay| r.closed))
///     .build()
///     .unwrap();
///
/// let mut device = SimulatedDevice::new(machine, Relay::default());
/// device.context_mut().closed = true;
/// device.tick(Duration::from_millis(10)).unwrap();
/// assert_eq!(device.state(), "closed");
/// ```
pub struct SimulatedDevice<C> {
    machine: StateMachine<C>,
    context: C,
}

impl<C> SimulatedDevice<C> {
    pub fn new(machine: StateMachine<C>, context: C) -> Self {
        Self { machine, context }
    }

    /// Advance the machine by `dt`, returning the transitions applied.
    pub fn tick(&mut self, dt: Duration) -> Result<usize, TickError> {
        self.machine.tick(&mut self.context, dt)
    }

    /// Current state name.
    pub fn state(&self) -> &str {
        self.machine.current_state()
    }

    /// Whether the transition to `target` would fire right now.
    pub fn can(&self, target: &str) -> bool {
        self.machine.can(&self.context, target)
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn machine(&self) -> &StateMachine<C> {
        &self.machine
    }

    /// Borrow the machine and the context together, for commands that check
    /// the machine before writing the context.
    pub fn parts_mut(&mut self) -> (&StateMachine<C>, &mut C) {
        (&self.machine, &mut self.context)
    }
}

impl<C: Send> Device for SimulatedDevice<C> {
    fn process(&mut self, dt: Duration) -> Result<(), TickError> {
        self.tick(dt).map(|_| ())
    }

    fn state(&self) -> &str {
        SimulatedDevice::state(self)
    }
}

impl<C> std::fmt::Debug for SimulatedDevice<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a device.
///
/// Ticks and external commands both go through the same lock, so a command
/// never observes or modifies a device in the middle of a tick.
pub struct DeviceHandle<D> {
    inner: Arc<Mutex<D>>,
}

impl<D> DeviceHandle<D> {
    pub fn new(device: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(device)),
        }
    }

    /// Lock the device for exclusive access.
    pub fn lock(&self) -> MutexGuard<'_, D> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the device.
    pub fn with<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<D: Device> DeviceHandle<D> {
    /// Advance the device by `dt` under the lock.
    pub fn process(&self, dt: Duration) -> Result<(), TickError> {
        self.inner.lock().process(dt)
    }

    /// Snapshot of the device's external state.
    pub fn state(&self) -> String {
        self.inner.lock().state().to_string()
    }
}

impl<D> std::fmt::Debug for DeviceHandle<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl<D> Clone for DeviceHandle<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
