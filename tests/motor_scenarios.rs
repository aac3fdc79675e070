//! End-to-end scenarios for the linear motor.

use statesim::device::DeviceHandle;
use statesim::devices::{Motor, MotorConfig};
use statesim::Simulation;
use std::time::Duration;

#[test]
fn reaches_target_in_thirty_seconds() {
    let mut motor = Motor::new().unwrap();
    assert!(motor.set_target(150.0));
    assert!(motor.set_speed(5.0));

    for _ in 0..29 {
        motor.tick(Duration::from_secs(1)).unwrap();
        assert_eq!(motor.state(), "moving");
    }

    motor.tick(Duration::from_secs(1)).unwrap();
    assert_eq!(motor.position(), 150.0);
    assert_eq!(motor.state(), "idle");

    motor.tick(Duration::from_secs(1)).unwrap();
    assert_eq!(motor.position(), 150.0);
    assert_eq!(motor.machine().history().path(), vec!["idle", "moving", "idle"]);
}

#[test]
fn coarse_ticks_clamp_to_target() {
    let mut motor = Motor::new().unwrap();
    motor.set_speed(10.0);
    motor.set_target(25.0);

    motor.tick(Duration::from_secs(60)).unwrap();

    assert_eq!(motor.position(), 25.0);
    assert_eq!(motor.state(), "idle");
}

#[test]
fn config_changes_limits() {
    let config = MotorConfig {
        max_target: 50.0,
        ..MotorConfig::default()
    };
    let mut motor = Motor::with_config(&config).unwrap();

    assert!(!motor.set_target(60.0));
    assert!(motor.set_target(50.0));
}

#[test]
fn simulation_accelerates_motor() {
    let mut motor = Motor::new().unwrap();
    motor.set_speed(5.0);
    motor.set_target(20.0);

    let mut simulation = Simulation::new(DeviceHandle::new(motor));
    simulation.set_speed(2.0);

    for _ in 0..4 {
        simulation.process(Duration::from_millis(500)).unwrap();
    }

    assert_eq!(simulation.runtime(), Duration::from_secs(4));
    assert_eq!(simulation.device().state(), "idle");
    assert_eq!(simulation.device().lock().position(), 20.0);
}

#[test]
fn paused_simulation_holds_position() {
    let mut motor = Motor::new().unwrap();
    motor.set_target(100.0);

    let mut simulation = Simulation::new(DeviceHandle::new(motor));
    simulation.process(Duration::from_secs(1)).unwrap();
    simulation.pause();
    simulation.process(Duration::from_secs(1)).unwrap();

    assert_eq!(simulation.device().lock().position(), 2.0);
    assert_eq!(simulation.cycles(), 1);
}
