//! Enemy roster example for unique-type-registry.
//!
//! Demonstrates:
//! - Registering variants and a base-only family kind
//! - Looking variants up by identifier and listing a group
//! - Spawning and tearing down on-demand variants
//!
//! Run with: `RUST_LOG=debug cargo run --example enemy_roster`

use std::sync::atomic::{AtomicU32, Ordering};

use tracing_subscriber::EnvFilter;
use unique_type_registry::{register_variant, Registry, Variant};

/// Family of everything hostile. Base-only: it has no identifier.
#[derive(Default)]
struct Enemy;

impl Variant for Enemy {
    fn group(&self) -> &str {
        "enemy"
    }
}

#[derive(Default)]
struct Goblin;

impl Variant for Goblin {
    fn identifier(&self) -> Option<&str> {
        Some("Goblin")
    }

    fn group(&self) -> &str {
        "enemy"
    }
}

#[derive(Default)]
struct Orc;

impl Variant for Orc {
    fn identifier(&self) -> Option<&str> {
        Some("Orc")
    }

    fn group(&self) -> &str {
        "enemy"
    }
}

/// Only spawned when the boss arena opens.
#[derive(Default)]
struct Boss {
    health: AtomicU32,
}

impl Boss {
    fn health(&self) -> u32 {
        self.health.load(Ordering::Relaxed)
    }
}

impl Variant for Boss {
    fn identifier(&self) -> Option<&str> {
        Some("Boss")
    }

    fn group(&self) -> &str {
        "enemy"
    }

    fn implicit_instantiation(&self) -> bool {
        false
    }

    fn on_construct(&self) {
        self.health.store(500, Ordering::Relaxed);
    }

    fn on_destroy(&self) {
        self.health.store(0, Ordering::Relaxed);
    }
}

register_variant!(Enemy; order = -1);
register_variant!(Goblin: Enemy);
register_variant!(Orc: Enemy);
register_variant!(Boss: Enemy);

fn roster(registry: &mut Registry) -> Vec<String> {
    registry
        .find_all::<Enemy>(None)
        .iter()
        .filter_map(|v| v.identifier().map(str::to_owned))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== unique-type-registry: Enemy Roster ===\n");

    let mut registry = Registry::discover();
    println!("1. Known identifiers: {:?}", registry.known_identifiers().collect::<Vec<_>>());
    println!("   Known groups:      {:?}", registry.known_groups().collect::<Vec<_>>());
    println!("   Roster:            {:?}", roster(&mut registry));

    match registry.find::<Enemy>("Goblin", None) {
        Some(goblin) => println!("\n2. Found {} in group {:?}", goblin.class_name(), goblin.group()),
        None => println!("\n2. No goblin registered"),
    }
    if registry.find::<Enemy>("Dragon", None).is_none() {
        println!("   No dragon, as expected");
    }

    println!("\n3. Opening the boss arena...");
    let spawned = registry.instantiate_implicits_for::<Enemy>();
    println!("   Spawned {} variant(s), roster: {:?}", spawned, roster(&mut registry));

    if let Some(boss) = registry.find::<Enemy>("Boss", None) {
        if let Ok(inner) = boss.downcast::<Boss>() {
            println!("   Boss health: {}", inner.health());
        }
    }

    println!("\n4. Clearing the regular enemies...");
    let destroyed = registry.destroy_implicits_for::<Enemy>();
    println!("   Destroyed {} variant(s), roster: {:?}", destroyed, roster(&mut registry));

    registry.shutdown();
    println!("\n=== Done ===");
}
