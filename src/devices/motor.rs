//! Linear motor that moves toward a target at a fixed speed.
//!
//! ```text
//!  idle ──[position != target]──▶ moving
//!    ▲                              │
//!    └──────[position == target]────┘
//! ```

use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::MachineConfig;
use crate::core::{Plain, State};
use crate::device::{Device, SimulatedDevice};
use crate::machine::{StateMachine, TickError};
use crate::transitions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const IDLE: &str = "idle";
pub const MOVING: &str = "moving";

/// Move `current` toward `target` by at most `rate * seconds`, landing
/// exactly on `target` instead of overshooting.
pub fn approach_linear(current: f64, target: f64, rate: f64, seconds: f64) -> f64 {
    let step = (rate * seconds).max(0.0);
    let delta = target - current;

    if delta.abs() <= step {
        target
    } else {
        current + step.copysign(delta)
    }
}

/// Attributes of a motor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorContext {
    position: f64,
    target: f64,
    speed: f64,
}

impl MotorContext {
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn advance(&mut self, dt: Duration) {
        self.position = approach_linear(self.position, self.target, self.speed, dt.as_secs_f64());
    }
}

/// Moving state: position approaches target every tick.
///
/// It also moves on entry with the entry tick's `dt`, so the tick in which a
/// new target is noticed already counts as travel time.
#[derive(Debug, Default)]
pub struct Moving;

impl State<MotorContext> for Moving {
    fn on_entry(&mut self, ctx: &mut MotorContext, dt: Duration) {
        ctx.advance(dt);
    }

    fn in_state(&mut self, ctx: &mut MotorContext, dt: Duration) {
        ctx.advance(dt);
    }
}

/// Motor limits and initial speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Initial speed in mm/s.
    pub speed: f64,
    pub min_target: f64,
    pub max_target: f64,
    pub max_speed: f64,
    pub machine: MachineConfig,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            min_target: 0.0,
            max_target: 250.0,
            max_speed: 10.0,
            machine: MachineConfig::default(),
        }
    }
}

/// Simulated linear motor.
///
/// # Example
///
/// ```rust
/// use statesim::devices::Motor;
/// use std::time::Duration;
///
/// let mut motor = Motor::new().unwrap();
/// motor.set_speed(5.0);
/// motor.set_target(10.0);
///
/// motor.tick(Duration::from_secs(1)).unwrap();
/// assert_eq!(motor.state(), "moving");
/// assert_eq!(motor.position(), 5.0);
///
/// motor.tick(Duration::from_secs(1)).unwrap();
/// assert_eq!(motor.state(), "idle");
/// assert_eq!(motor.position(), 10.0);
/// ```
#[derive(Debug)]
pub struct Motor {
    device: SimulatedDevice<MotorContext>,
    min_target: f64,
    max_target: f64,
    max_speed: f64,
}

impl Motor {
    pub fn new() -> Result<Self, BuildError> {
        Self::with_config(&MotorConfig::default())
    }

    pub fn with_config(config: &MotorConfig) -> Result<Self, BuildError> {
        let machine = StateMachineBuilder::<MotorContext>::new()
            .initial(IDLE)
            .state(IDLE, Plain)
            .state(MOVING, Moving)
            .transitions(transitions![MotorContext;
                "idle" => "moving" if |m| m.position != m.target,
                "moving" => "idle" if |m| m.position == m.target,
            ])
            .config(config.machine.clone())
            .build()?;

        let context = MotorContext {
            position: 0.0,
            target: 0.0,
            speed: config.speed,
        };

        Ok(Self {
            device: SimulatedDevice::new(machine, context),
            min_target: config.min_target,
            max_target: config.max_target,
            max_speed: config.max_speed,
        })
    }

    pub fn tick(&mut self, dt: Duration) -> Result<usize, TickError> {
        self.device.tick(dt)
    }

    /// Current state, `idle` or `moving`.
    pub fn state(&self) -> &str {
        self.device.state()
    }

    pub fn position(&self) -> f64 {
        self.device.context().position
    }

    pub fn target(&self) -> f64 {
        self.device.context().target
    }

    pub fn speed(&self) -> f64 {
        self.device.context().speed
    }

    pub fn context(&self) -> &MotorContext {
        self.device.context()
    }

    pub fn machine(&self) -> &StateMachine<MotorContext> {
        self.device.machine()
    }

    /// Limits accepted by [`set_target`](Motor::set_target).
    pub fn target_limits(&self) -> (f64, f64) {
        (self.min_target, self.max_target)
    }

    /// Command a new target. Ignored while moving or out of range.
    pub fn set_target(&mut self, target: f64) -> bool {
        if self.state() == MOVING {
            tracing::debug!(target, "Ignoring new target while moving");
            return false;
        }
        if !(self.min_target..=self.max_target).contains(&target) {
            tracing::debug!(
                target,
                min = self.min_target,
                max = self.max_target,
                "Ignoring out-of-range target"
            );
            return false;
        }

        self.device.context_mut().target = target;
        true
    }

    /// Set the speed in mm/s. Ignored when outside `[0, max_speed]`.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !(0.0..=self.max_speed).contains(&speed) {
            tracing::debug!(speed, max = self.max_speed, "Ignoring out-of-range speed");
            return false;
        }

        self.device.context_mut().speed = speed;
        true
    }

    /// Stop where the motor currently is.
    pub fn stop(&mut self) {
        let ctx = self.device.context_mut();
        ctx.target = ctx.position;
        tracing::debug!(position = ctx.position, "Motor stopped");
    }
}

impl Device for Motor {
    fn process(&mut self, dt: Duration) -> Result<(), TickError> {
        self.tick(dt).map(|_| ())
    }

    fn state(&self) -> &str {
        Motor::state(self)
    }
}
