//! The variant registry.
//!
//! A [`Registry`] owns one instance of every registered variant type that opts
//! into implicit instantiation, indexes them by identifier and group, and
//! memoises lookups.
//!
//! # Examples
//!
//! ```
//! use unique_type_registry::{register_variant, Registry, Variant};
//!
//! #[derive(Default)]
//! struct Enemy;
//! impl Variant for Enemy {
//!     fn group(&self) -> &str {
//!         "enemy"
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Goblin;
//! impl Variant for Goblin {
//!     fn identifier(&self) -> Option<&str> {
//!         Some("Goblin")
//!     }
//!     fn group(&self) -> &str {
//!         "enemy"
//!     }
//! }
//!
//! register_variant!(Enemy);
//! register_variant!(Goblin: Enemy);
//!
//! let mut registry = Registry::discover();
//! let goblin = registry.find::<Enemy>("Goblin", None).expect("registered at startup");
//! assert!(goblin.is::<Goblin>());
//! assert!(registry.find::<Enemy>("Dragon", None).is_none());
//! ```
//!
//! # Threading
//!
//! All mutating calls, lookups included, take `&mut self`. Share a registry
//! across threads by wrapping it in a lock, as [`define_registry!`](crate::define_registry)
//! does.

use std::any::TypeId;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::{debug, info, trace};

use crate::cache::{GroupKey, LookupCache, LookupKey};
use crate::entry::{self, VariantEntry};
use crate::registry_event::emit;
use crate::variant::{class_name_of, Variant};
use crate::{RegistryConfig, RegistryError, RegistryEvent, TraceCallback, VariantRef};

pub struct Registry {
    config: RegistryConfig,
    catalog: Vec<&'static VariantEntry>,
    variants: Vec<VariantRef>,
    known_identifiers: IndexSet<String>,
    known_groups: IndexSet<String>,
    cache: LookupCache,
}

impl Registry {
    /// Starts a registry over every variant linked into the binary.
    ///
    /// The catalog is ordered by each entry's `order` (see
    /// [`register_variant!`](crate::register_variant)), then by class name, so
    /// "first registered" means first in that order rather than in source order.
    pub fn discover() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::from_entries(entry::discovered(), config)
    }

    /// Starts a registry over an explicit catalog, kept in the given order.
    pub fn from_entries<I>(entries: I, config: RegistryConfig) -> Self
    where
        I: IntoIterator<Item = &'static VariantEntry>,
    {
        let mut registry = Self {
            config,
            catalog: entries.into_iter().collect(),
            variants: Vec::new(),
            known_identifiers: IndexSet::new(),
            known_groups: IndexSet::new(),
            cache: LookupCache::default(),
        };
        registry.initialize();
        registry
    }

    fn initialize(&mut self) {
        for &entry in &self.catalog {
            let instance = entry.create();
            let retained = instance.implicit_instantiation();
            emit(
                &self.config.trace,
                RegistryEvent::Discover {
                    class_name: entry.class_name(),
                    retained,
                },
            );
            debug!(class_name = entry.class_name(), retained, "discovered variant");
            if !retained {
                continue;
            }

            let variant = VariantRef::new(entry, instance);
            if !variant.is_base_only() {
                if let Some(name) = variant.lookup_name() {
                    if !self.known_identifiers.contains(name) {
                        self.known_identifiers.insert(name.to_owned());
                    }
                }
            }
            if !self.known_groups.contains(variant.group()) {
                self.known_groups.insert(variant.group().to_owned());
            }
            self.variants.push(variant);
        }

        for variant in &self.variants {
            variant.construct();
            emit(
                &self.config.trace,
                RegistryEvent::Construct {
                    class_name: variant.class_name(),
                },
            );
        }

        info!(
            catalog = self.catalog.len(),
            active = self.variants.len(),
            groups = self.known_groups.len(),
            "variant registry initialized"
        );
    }

    /// Activates the variants that opted out of implicit instantiation.
    ///
    /// Types already active are skipped, as are types outside `group` when one
    /// is given. Returns the number of variants constructed.
    pub fn instantiate_implicits(&mut self, group: Option<&str>) -> usize {
        let mut created = 0;
        for &entry in &self.catalog {
            if self.variants.iter().any(|v| v.variant_type() == entry.variant_type()) {
                continue;
            }
            let instance = entry.create();
            if instance.implicit_instantiation() {
                continue;
            }
            if group.is_some_and(|g| instance.group() != g) {
                continue;
            }

            let variant = VariantRef::new(entry, instance);
            variant.construct();
            debug!(
                class_name = variant.class_name(),
                group = variant.group(),
                "constructed variant"
            );
            emit(
                &self.config.trace,
                RegistryEvent::Construct {
                    class_name: variant.class_name(),
                },
            );
            self.variants.push(variant);
            created += 1;
        }

        info!(group, created, "instantiated variants");
        self.after_mutation(created);
        created
    }

    /// [`Registry::instantiate_implicits`] scoped to the lookup group of `K`.
    pub fn instantiate_implicits_for<K: Variant + Default>(&mut self) -> usize {
        let representative = K::default();
        self.instantiate_implicits(representative.lookup_group())
    }

    /// Tears down implicitly instantiated variants.
    ///
    /// Removes every active variant whose `implicit_instantiation()` is `true`
    /// and whose group equals `group` (any group when `None`). Variants added by
    /// [`Registry::instantiate_implicits`] are left alone. Returns the number of
    /// variants destroyed.
    pub fn destroy_implicits(&mut self, group: Option<&str>) -> usize {
        let trace = &self.config.trace;
        let before = self.variants.len();
        self.variants.retain(|variant| {
            let doomed = variant.implicit_instantiation()
                && group.map_or(true, |g| variant.group() == g);
            if doomed {
                variant.destroy();
                debug!(
                    class_name = variant.class_name(),
                    group = variant.group(),
                    "destroyed variant"
                );
                emit(
                    trace,
                    RegistryEvent::Destroy {
                        class_name: variant.class_name(),
                    },
                );
            }
            !doomed
        });
        let destroyed = before - self.variants.len();

        info!(group, destroyed, "destroyed variants");
        self.after_mutation(destroyed);
        destroyed
    }

    /// [`Registry::destroy_implicits`] scoped to the lookup group of `K`.
    pub fn destroy_implicits_for<K: Variant + Default>(&mut self) -> usize {
        let representative = K::default();
        self.destroy_implicits(representative.lookup_group())
    }

    fn after_mutation(&mut self, changed: usize) {
        if changed > 0 && self.config.invalidate_on_mutation {
            self.clear_caches();
        }
    }

    /// Finds the first variant of kind `K` whose lookup name is `identifier`.
    ///
    /// Without a `group`, the lookup group of `K` applies. Base-only variants
    /// are never returned. Hits are cached per `(K, identifier, group)`; misses
    /// are not, so later instantiations become visible.
    pub fn find<K: Variant + Default>(
        &mut self,
        identifier: &str,
        group: Option<&str>,
    ) -> Option<VariantRef> {
        let kind = TypeId::of::<K>();
        let key = LookupKey::new(kind, identifier, group);

        if let Some(position) = self.cache.position(&key) {
            if let Some(variant) = self.variants.get(position) {
                trace!(kind = class_name_of::<K>(), identifier, position, "lookup cache hit");
                let variant = variant.clone();
                self.emit_find::<K>(identifier, true, true);
                return Some(variant);
            }
            self.cache.forget(&key);
        }

        let representative;
        let group = match group {
            Some(group) => Some(group),
            None => {
                representative = K::default();
                representative.lookup_group()
            }
        };

        let position = self.variants.iter().position(|variant| {
            is_listed(variant, kind, group) && variant.lookup_name() == Some(identifier)
        });
        trace!(kind = class_name_of::<K>(), identifier, group, ?position, "lookup scan");

        let found = position.map(|position| {
            self.cache.remember(key, position);
            self.variants[position].clone()
        });
        self.emit_find::<K>(identifier, found.is_some(), false);
        found
    }

    /// Like [`Registry::find`], reporting a miss as an error.
    ///
    /// # Errors
    ///
    /// [`RegistryError::VariantNotFound`] when no variant matches.
    pub fn require<K: Variant + Default>(
        &mut self,
        identifier: &str,
        group: Option<&str>,
    ) -> Result<VariantRef, RegistryError> {
        self.find::<K>(identifier, group)
            .ok_or_else(|| RegistryError::VariantNotFound {
                identifier: identifier.to_owned(),
                group: group.map(str::to_owned),
            })
    }

    /// Every non-base-only variant of kind `K` in `group`, in discovery order.
    ///
    /// Without a `group`, the lookup group of `K` applies. Non-empty results
    /// are cached per `(K, group)`.
    pub fn find_all<K: Variant + Default>(&mut self, group: Option<&str>) -> Vec<VariantRef> {
        let kind = TypeId::of::<K>();
        let key = GroupKey::new(kind, group);

        if let Some(positions) = self.cache.positions(&key) {
            if positions.iter().all(|&p| p < self.variants.len()) {
                let variants: Vec<VariantRef> =
                    positions.iter().map(|&p| self.variants[p].clone()).collect();
                trace!(kind = class_name_of::<K>(), group, count = variants.len(), "group cache hit");
                self.emit_find_all::<K>(group, variants.len(), true);
                return variants;
            }
            self.cache.forget_group(&key);
        }

        let representative;
        let effective = match group {
            Some(group) => Some(group),
            None => {
                representative = K::default();
                representative.lookup_group()
            }
        };

        let positions: Vec<usize> = self
            .variants
            .iter()
            .enumerate()
            .filter(|(_, variant)| is_listed(variant, kind, effective))
            .map(|(position, _)| position)
            .collect();
        let variants: Vec<VariantRef> = positions
            .iter()
            .map(|&p| self.variants[p].clone())
            .collect();
        trace!(kind = class_name_of::<K>(), group = effective, count = variants.len(), "group scan");

        self.cache.remember_group(key, positions);
        self.emit_find_all::<K>(group, variants.len(), false);
        variants
    }

    fn emit_find<K>(&self, identifier: &str, found: bool, cached: bool) {
        emit(
            &self.config.trace,
            RegistryEvent::Find {
                kind: class_name_of::<K>(),
                identifier: identifier.to_owned(),
                found,
                cached,
            },
        );
    }

    fn emit_find_all<K>(&self, group: Option<&str>, count: usize, cached: bool) {
        emit(
            &self.config.trace,
            RegistryEvent::FindAll {
                kind: class_name_of::<K>(),
                group: group.map(str::to_owned),
                count,
                cached,
            },
        );
    }

    /// Drops every memoised lookup.
    pub fn clear_caches(&mut self) {
        self.cache.clear();
        trace!("lookup caches cleared");
        emit(&self.config.trace, RegistryEvent::CacheCleared {});
    }

    /// Lookup names of the non-base-only variants kept at startup, first seen first.
    pub fn known_identifiers(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.known_identifiers.iter().map(String::as_str)
    }

    /// Groups of the variants kept at startup, first seen first.
    pub fn known_groups(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.known_groups.iter().map(String::as_str)
    }

    /// Active variants in discovery order, base-only ones included.
    pub fn variants(&self) -> &[VariantRef] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Every variant type this registry knows how to create.
    pub fn catalog(&self) -> &[&'static VariantEntry] {
        &self.catalog
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn set_trace_callback(&mut self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let callback: Arc<TraceCallback> = Arc::new(callback);
        self.config.trace = Some(callback);
    }

    pub fn clear_trace_callback(&mut self) {
        self.config.trace = None;
    }

    /// Ends the registry's lifecycle, running `on_destroy` on every
    /// constructed variant in discovery order.
    pub fn shutdown(mut self) {
        for variant in self.variants.drain(..) {
            if variant.is_constructed() {
                variant.destroy();
                emit(
                    &self.config.trace,
                    RegistryEvent::Destroy {
                        class_name: variant.class_name(),
                    },
                );
            }
        }
        self.cache.clear();
        emit(&self.config.trace, RegistryEvent::Shutdown {});
        info!("variant registry shut down");
    }
}

/// Whether `variant` may appear in lookups of `kind` within `group`.
fn is_listed(variant: &VariantRef, kind: TypeId, group: Option<&str>) -> bool {
    !variant.is_base_only()
        && group.map_or(true, |g| variant.group() == g)
        && variant.entry().admits(kind)
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("catalog", &self.catalog.len())
            .field("variants", &self.variants)
            .field("known_groups", &self.known_groups)
            .field("config", &self.config)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
