//! Core trait defining process-wide registry access.
//!
//! This module provides the `RegistryApi` trait with default implementations
//! that forward to a [`Registry`] kept behind a `LazyLock<Mutex<_>>` static.
//! The registry is discovered on first access, which plays the role of the
//! implicit startup initialisation.

use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::{Registry, RegistryError, RegistryEvent, Variant, VariantRef};

/// Core trait defining process-wide registry behavior.
///
/// Provides default implementations for all operations, requiring only the
/// `storage` accessor to be implemented. [`define_registry!`](crate::define_registry)
/// generates an implementor.
pub trait RegistryApi {
    /// Access the storage static.
    fn storage() -> &'static LazyLock<Mutex<Registry>>;

    /// Lock the registry.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// A poisoned lock is recovered by extracting the inner value. Lookups and
    /// lifecycle calls leave the registry consistent between variants, so a
    /// panic inside a variant hook does not corrupt it.
    fn lock(&self) -> MutexGuard<'static, Registry> {
        Self::storage().lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Run `f` with exclusive access to the registry.
    ///
    /// The closure must not call back into the same registry, as this will
    /// deadlock.
    fn with<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        f(&mut self.lock())
    }

    fn find<K: Variant + Default>(&self, identifier: &str, group: Option<&str>) -> Option<VariantRef> {
        self.lock().find::<K>(identifier, group)
    }

    /// Find a variant, reporting a miss as an error.
    ///
    /// # Errors
    ///
    /// - Registry lock is poisoned
    /// - No variant of kind `K` matches
    fn require<K: Variant + Default>(
        &self,
        identifier: &str,
        group: Option<&str>,
    ) -> Result<VariantRef, RegistryError> {
        let mut registry = Self::storage()
            .lock()
            .map_err(|_| RegistryError::RegistryLock)?;
        registry.require::<K>(identifier, group)
    }

    fn find_all<K: Variant + Default>(&self, group: Option<&str>) -> Vec<VariantRef> {
        self.lock().find_all::<K>(group)
    }

    fn instantiate_implicits(&self, group: Option<&str>) -> usize {
        self.lock().instantiate_implicits(group)
    }

    fn instantiate_implicits_for<K: Variant + Default>(&self) -> usize {
        self.lock().instantiate_implicits_for::<K>()
    }

    fn destroy_implicits(&self, group: Option<&str>) -> usize {
        self.lock().destroy_implicits(group)
    }

    fn destroy_implicits_for<K: Variant + Default>(&self) -> usize {
        self.lock().destroy_implicits_for::<K>()
    }

    fn known_identifiers(&self) -> Vec<String> {
        self.lock().known_identifiers().map(str::to_owned).collect()
    }

    fn known_groups(&self) -> Vec<String> {
        self.lock().known_groups().map(str::to_owned).collect()
    }

    /// Set a tracing callback for registry operations.
    ///
    /// The callback runs while the registry lock is held and must NOT call any
    /// registry methods on the same registry.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        self.lock().set_trace_callback(callback);
    }

    fn clear_trace_callback(&self) {
        self.lock().clear_trace_callback();
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::RegistryApi;
    use crate::{Registry, RegistryConfig, RegistryError, Variant, VariantEntry};

    use serial_test::serial;
    use std::sync::{Arc, LazyLock, Mutex};

    #[derive(Default)]
    struct Tower;
    impl Variant for Tower {
        fn identifier(&self) -> Option<&str> {
            Some("tower")
        }
        fn group(&self) -> &str {
            "building"
        }
    }

    #[derive(Default)]
    struct Forge;
    impl Variant for Forge {
        fn identifier(&self) -> Option<&str> {
            Some("forge")
        }
        fn group(&self) -> &str {
            "building"
        }
        fn implicit_instantiation(&self) -> bool {
            false
        }
    }

    static TOWER: VariantEntry = crate::variant_entry!(Tower);
    static FORGE: VariantEntry = crate::variant_entry!(Forge: Tower);

    static STORAGE: LazyLock<Mutex<Registry>> = LazyLock::new(|| {
        Mutex::new(Registry::from_entries(
            [&TOWER, &FORGE],
            RegistryConfig::default(),
        ))
    });

    struct Api;

    impl RegistryApi for Api {
        fn storage() -> &'static LazyLock<Mutex<Registry>> {
            &STORAGE
        }
    }

    const API: Api = Api;

    fn reset() {
        API.with(|registry| {
            *registry = Registry::from_entries([&TOWER, &FORGE], RegistryConfig::default());
        });
    }

    #[test]
    #[serial]
    fn test_find_through_api() {
        reset();
        assert!(API.find::<Tower>("tower", None).is_some());
        assert!(API.find::<Tower>("forge", None).is_none());
        assert_eq!(API.known_identifiers(), vec!["tower".to_string()]);
        assert_eq!(API.known_groups(), vec!["building".to_string()]);
    }

    #[test]
    #[serial]
    fn test_lifecycle_through_api() {
        reset();
        assert_eq!(API.instantiate_implicits_for::<Tower>(), 1);
        assert_eq!(API.find_all::<Tower>(None).len(), 2);

        assert_eq!(API.destroy_implicits_for::<Tower>(), 1);
        let remaining = API.find_all::<Tower>(None);
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].is::<Forge>());
    }

    #[test]
    #[serial]
    fn test_require_through_api() {
        reset();
        assert!(API.require::<Tower>("tower", Some("building")).is_ok());
        assert_eq!(
            API.require::<Tower>("castle", None).unwrap_err(),
            RegistryError::VariantNotFound {
                identifier: "castle".into(),
                group: None,
            }
        );
    }

    #[test]
    #[serial]
    fn test_trace_callback_through_api() {
        reset();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        API.set_trace_callback(move |event| {
            sink.lock().unwrap().push(event.to_string());
        });

        API.find::<Tower>("tower", None);
        API.clear_trace_callback();
        API.find::<Tower>("tower", None);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert!(captured[0].starts_with("find { kind: Tower"));
    }

    #[test]
    #[serial]
    fn test_poisoned_lock_is_recovered() {
        reset();
        let _ = std::thread::spawn(|| {
            API.with(|_| panic!("poison the registry lock"));
        })
        .join();

        assert!(API.find::<Tower>("tower", None).is_some());
        assert_eq!(
            API.require::<Tower>("tower", None).unwrap_err(),
            RegistryError::RegistryLock
        );
        STORAGE.clear_poison();
    }
}
