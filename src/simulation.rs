//! Cycle driver that feeds clock time into a device.

use crate::device::{Device, DeviceHandle};
use crate::machine::TickError;
use std::time::Duration;

/// Drives a device from wall-clock increments.
///
/// Each call to [`process`](Simulation::process) scales the real elapsed time
/// by the simulation speed and ticks the device once under its lock. A paused
/// simulation ignores time entirely.
///
/// # Example
///
/// ```rust
/// use statesim::devices::Motor;
/// use statesim::device::DeviceHandle;
/// use statesim::Simulation;
/// use std::time::Duration;
///
/// let mut simulation = Simulation::new(DeviceHandle::new(Motor::new().unwrap()));
/// simulation.set_speed(10.0);
/// simulation.process(Duration::from_secs(1)).unwrap();
///
/// assert_eq!(simulation.runtime(), Duration::from_secs(10));
/// assert_eq!(simulation.cycles(), 1);
/// ```
#[derive(Debug)]
pub struct Simulation<D> {
    device: DeviceHandle<D>,
    speed: f64,
    paused: bool,
    cycles: u64,
    runtime: Duration,
}

impl<D: Device> Simulation<D> {
    pub fn new(device: DeviceHandle<D>) -> Self {
        Self {
            device,
            speed: 1.0,
            paused: false,
            cycles: 0,
            runtime: Duration::ZERO,
        }
    }

    /// Advance the simulation by `real_dt` of wall-clock time.
    ///
    /// Returns `Ok(false)` without touching the device while paused.
    pub fn process(&mut self, real_dt: Duration) -> Result<bool, TickError> {
        if self.paused {
            return Ok(false);
        }

        let dt = self.scaled(real_dt);
        self.device.process(dt)?;

        self.cycles += 1;
        self.runtime = self.runtime.saturating_add(dt);
        Ok(true)
    }

    /// Scale `real_dt` by the speed, saturating at `Duration::MAX`.
    fn scaled(&self, real_dt: Duration) -> Duration {
        let seconds = real_dt.as_secs_f64() * self.speed;
        Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| {
            tracing::debug!(seconds, "Scaled dt out of range, saturating");
            Duration::MAX
        })
    }

    /// Set the time acceleration factor. Negative or non-finite values are
    /// ignored.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !speed.is_finite() || speed < 0.0 {
            tracing::debug!(speed, "Ignoring invalid simulation speed");
            return false;
        }
        self.speed = speed;
        true
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Device ticks performed.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Simulated time fed to the device.
    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    /// Handle to the simulated device, for issuing commands.
    pub fn device(&self) -> &DeviceHandle<D> {
        &self.device
    }
}
