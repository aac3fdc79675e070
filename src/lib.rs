//! Statesim: a time-stepped state machine core for simulated devices
//!
//! A device is a state machine bound to a context of attributes. An external
//! clock advances it with `tick(dt)`: the current state's in-state behaviour
//! runs, then the ordered transition table is scanned and the first rule
//! whose guard holds is applied, chaining through zero-duration states until
//! the table is quiescent.
//!
//! # Core Concepts
//!
//! - **State**: entry, in-state and exit hooks via the `State` trait
//! - **Guards**: pure predicates over the device context
//! - **State variants**: timed actions, continuous decay, decay with a deadline
//! - **Devices**: a machine plus its context, shared behind one lock
//!
//! # Example
//!
//! ```rust
//! use statesim::devices::Pet;
//! use std::time::Duration;
//!
//! let mut pet = Pet::new().unwrap();
//! pet.set_name("Bit");
//! pet.tick(Duration::from_secs(1)).unwrap();
//! assert_eq!(pet.status(), "happy");
//!
//! pet.feed();
//! pet.tick(Duration::from_secs(1)).unwrap();
//! assert_eq!(pet.status(), "eating");
//!
//! for _ in 0..5 {
//!     pet.tick(Duration::from_secs(1)).unwrap();
//! }
//! assert_eq!(pet.status(), "happy");
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod device;
pub mod devices;
pub mod machine;
pub mod simulation;
pub mod states;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use config::MachineConfig;
pub use core::{Guard, Plain, State};
pub use device::{Device, DeviceHandle, SimulatedDevice};
pub use machine::{StateMachine, TickError, Transition};
pub use simulation::Simulation;
