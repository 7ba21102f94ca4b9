//! Integration tests for on-demand instantiation and teardown.
//!
//! Hook invocations are counted inside the variants themselves, so each
//! registry observes only its own instances.

use std::sync::atomic::{AtomicUsize, Ordering};

use unique_type_registry::{register_variant, Registry, RegistryConfig, Variant, VariantRef};

#[derive(Default)]
struct Hooks {
    constructs: AtomicUsize,
    destroys: AtomicUsize,
}

trait Counted {
    fn hooks(&self) -> &Hooks;
}

impl Hooks {
    fn construct(&self) {
        self.constructs.fetch_add(1, Ordering::SeqCst);
    }

    fn destroy(&self) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
    }
}

macro_rules! variant {
    ($name:ident, $group:literal, implicit = $implicit:literal) => {
        #[derive(Default)]
        struct $name {
            hooks: Hooks,
        }

        impl Variant for $name {
            fn identifier(&self) -> Option<&str> {
                Some(stringify!($name))
            }
            fn group(&self) -> &str {
                $group
            }
            fn implicit_instantiation(&self) -> bool {
                $implicit
            }
            fn on_construct(&self) {
                self.hooks.construct();
            }
            fn on_destroy(&self) {
                self.hooks.destroy();
            }
        }

        impl Counted for $name {
            fn hooks(&self) -> &Hooks {
                &self.hooks
            }
        }
    };
}

#[derive(Default)]
struct Enemy;
impl Variant for Enemy {
    fn group(&self) -> &str {
        "enemy"
    }
}

#[derive(Default)]
struct Item;
impl Variant for Item {
    fn group(&self) -> &str {
        "item"
    }
}

variant!(Goblin, "enemy", implicit = true);
variant!(Orc, "enemy", implicit = true);
variant!(Boss, "enemy", implicit = false);
variant!(Potion, "item", implicit = true);
variant!(Relic, "item", implicit = false);

register_variant!(Enemy; order = -1);
register_variant!(Item; order = -1);
register_variant!(Goblin: Enemy; order = 0);
register_variant!(Orc: Enemy; order = 1);
register_variant!(Boss: Enemy; order = 2);
register_variant!(Potion: Item);
register_variant!(Relic: Item);

fn hooks<T: Variant + Counted>(variant: &VariantRef) -> (usize, usize) {
    let hooks = variant.downcast::<T>().unwrap().hooks();
    (
        hooks.constructs.load(Ordering::SeqCst),
        hooks.destroys.load(Ordering::SeqCst),
    )
}

fn identifiers(variants: &[VariantRef]) -> Vec<&str> {
    variants.iter().filter_map(|v| v.identifier()).collect()
}

#[test]
fn test_boss_scenario() {
    let mut registry = Registry::discover();
    assert_eq!(identifiers(&registry.find_all::<Enemy>(Some("enemy"))), ["Goblin", "Orc"]);

    assert_eq!(registry.instantiate_implicits(Some("enemy")), 1);

    let enemies = registry.find_all::<Enemy>(Some("enemy"));
    assert_eq!(identifiers(&enemies), ["Goblin", "Orc", "Boss"]);
    let boss = &enemies[2];
    assert!(boss.is_constructed());
    assert_eq!(hooks::<Boss>(boss), (1, 0));

    // Relic belongs to another group and stays dormant.
    assert!(registry.find::<Item>("Relic", None).is_none());
}

#[test]
fn test_instantiate_without_group_activates_all() {
    let mut registry = Registry::discover();
    assert_eq!(registry.instantiate_implicits(None), 2);
    assert!(registry.find::<Enemy>("Boss", None).is_some());
    assert!(registry.find::<Item>("Relic", None).is_some());

    // Already active types are not created twice.
    assert_eq!(registry.instantiate_implicits(None), 0);
    let relic = registry.find::<Item>("Relic", None).unwrap();
    assert_eq!(hooks::<Relic>(&relic), (1, 0));
}

#[test]
fn test_instantiate_for_kind_uses_its_group() {
    let mut registry = Registry::discover();
    assert_eq!(registry.instantiate_implicits_for::<Item>(), 1);
    assert!(registry.find::<Item>("Relic", None).is_some());
    assert!(registry.find::<Enemy>("Boss", None).is_none());
}

#[test]
fn test_implicit_variants_are_constructed_once() {
    let mut registry = Registry::discover();
    let goblin = registry.find::<Enemy>("Goblin", None).unwrap();
    assert!(goblin.is_constructed());
    assert_eq!(hooks::<Goblin>(&goblin), (1, 0));
}

#[test]
fn test_destroy_removes_only_implicit_variants_of_group() {
    let mut registry = Registry::discover();
    registry.instantiate_implicits(None);

    let goblin = registry.find::<Enemy>("Goblin", None).unwrap();
    let potion = registry.find::<Item>("Potion", None).unwrap();
    let boss = registry.find::<Enemy>("Boss", None).unwrap();

    // Enemy, Goblin and Orc go; Boss came from instantiate_implicits and stays.
    assert_eq!(registry.destroy_implicits(Some("enemy")), 3);

    assert!(!goblin.is_constructed());
    assert_eq!(hooks::<Goblin>(&goblin), (1, 1));
    assert!(potion.is_constructed());
    assert_eq!(hooks::<Potion>(&potion), (1, 0));
    assert!(boss.is_constructed());

    assert!(registry.find::<Enemy>("Goblin", None).is_none());
    assert_eq!(identifiers(&registry.find_all::<Enemy>(None)), ["Boss"]);

    // Nothing left to tear down in that group.
    assert_eq!(registry.destroy_implicits(Some("enemy")), 0);
    assert_eq!(hooks::<Goblin>(&goblin), (1, 1));
}

#[test]
fn test_destroy_for_kind_uses_its_group() {
    let mut registry = Registry::discover();
    assert_eq!(registry.destroy_implicits_for::<Item>(), 2);
    assert!(registry.find::<Item>("Potion", None).is_none());
    assert!(registry.find::<Enemy>("Orc", None).is_some());
}

#[test]
fn test_stale_caches_when_preserved() {
    let mut registry = Registry::with_config(RegistryConfig::default().preserve_stale_caches());
    assert_eq!(identifiers(&registry.find_all::<Enemy>(None)), ["Goblin", "Orc"]);

    registry.instantiate_implicits(Some("enemy"));

    // The cached listing predates Boss.
    assert_eq!(identifiers(&registry.find_all::<Enemy>(None)), ["Goblin", "Orc"]);
    // A key never looked up before sees it.
    assert_eq!(
        identifiers(&registry.find_all::<Enemy>(Some("enemy"))),
        ["Goblin", "Orc", "Boss"]
    );

    registry.clear_caches();
    assert_eq!(identifiers(&registry.find_all::<Enemy>(None)), ["Goblin", "Orc", "Boss"]);
}

#[test]
fn test_shutdown_runs_destroy_hooks() {
    let mut registry = Registry::discover();
    registry.instantiate_implicits(Some("item"));
    let relic = registry.find::<Item>("Relic", None).unwrap();
    let orc = registry.find::<Enemy>("Orc", None).unwrap();

    registry.shutdown();

    assert_eq!(hooks::<Relic>(&relic), (1, 1));
    assert_eq!(hooks::<Orc>(&orc), (1, 1));
    assert!(!orc.is_constructed());
}
