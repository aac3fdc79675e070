//! Pet Lifecycle
//!
//! This example demonstrates a virtual pet driven by a simulated clock.
//!
//! Key concepts:
//! - Naming the pet starts the simulation
//! - Commands are only accepted when the pet can react to them
//! - Timed actions apply their effect once they finish
//! - A neglected pet decays, starts dying and eventually dies
//!
//! Run with: cargo run --example pet_lifecycle

use statesim::devices::Pet;
use std::time::Duration;

fn report(pet: &Pet) {
    println!(
        "  {:<9} energy {:>5.1}  tired {:>5.1}  bored {:>5.1}  clean {:>5.1}  age {:.2}",
        pet.status(),
        pet.energy(),
        pet.tired(),
        pet.bored(),
        pet.clean(),
        pet.age()
    );
}

fn main() {
    println!("=== Pet Lifecycle Example ===\n");

    let mut pet = Pet::new().unwrap();
    let second = Duration::from_secs(1);

    println!("Name: {}", pet.name_or_placeholder());
    pet.set_name("Bit");
    pet.tick(second).unwrap();
    println!("Name: {}", pet.name_or_placeholder());
    report(&pet);

    println!("\nFeeding...");
    println!("  accepted: {}", pet.feed());
    println!("  play while pending: {}", pet.play());
    for _ in 0..6 {
        pet.tick(second).unwrap();
        report(&pet);
    }

    println!("\nLeaving the pet alone...");
    let mut last = pet.status().to_string();
    let mut elapsed = 0u64;
    while pet.status() != "dead" {
        pet.tick(second).unwrap();
        elapsed += 1;
        if pet.status() != last {
            println!("  after {}s:", elapsed);
            report(&pet);
            last = pet.status().to_string();
        }
    }

    println!("\nVisited states:");
    for transition in pet.machine().history().transitions() {
        println!(
            "  {:>5.0}s  {} -> {}",
            transition.sim_time.as_secs_f64(),
            transition.from,
            transition.to
        );
    }

    println!("\n=== Example Complete ===");
}
