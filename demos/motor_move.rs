//! Motor Move
//!
//! This example demonstrates a linear motor driven through a simulation.
//!
//! Key concepts:
//! - Commands go through a shared device handle
//! - The simulation scales wall-clock time by its speed
//! - The motor lands exactly on its target
//!
//! Run with: cargo run --example motor_move

use statesim::device::DeviceHandle;
use statesim::devices::Motor;
use statesim::Simulation;
use std::time::Duration;

fn main() {
    println!("=== Motor Move Example ===\n");

    let handle = DeviceHandle::new(Motor::new().unwrap());
    handle.with(|motor| {
        motor.set_speed(5.0);
        motor.set_target(42.0);
    });

    let mut simulation = Simulation::new(handle.clone());
    simulation.set_speed(4.0);

    while simulation.cycles() == 0 || handle.state() == "moving" {
        simulation.process(Duration::from_millis(250)).unwrap();
        let motor = handle.lock();
        println!(
            "t={:>4.1}s  {:<6}  position {:>5.1}",
            simulation.runtime().as_secs_f64(),
            motor.state(),
            motor.position()
        );
    }

    println!("\nTarget out of range accepted: {}", handle.with(|m| m.set_target(300.0)));
    println!("\n=== Example Complete ===");
}
