//! Concrete simulated devices.

pub mod motor;
pub mod pet;

pub use motor::{Motor, MotorConfig, MotorContext};
pub use pet::{Pet, PetAction, PetConfig, PetContext};
