//! Macros for registering variants and creating process-wide registries.

/// Builds a [`VariantEntry`](crate::VariantEntry) constant for a variant type.
///
/// The type must implement [`Variant`](crate::Variant) and `Default`. Types
/// listed after the colon are the kinds (families) the variant belongs to.
/// An optional `order` sorts the entry within discovered catalogs.
///
/// Most code wants [`register_variant!`] instead; this macro is useful for
/// building explicit catalogs for [`Registry::from_entries`](crate::Registry::from_entries).
///
/// ```rust
/// use unique_type_registry::{variant_entry, Registry, RegistryConfig, Variant, VariantEntry};
///
/// #[derive(Default)]
/// struct Lantern;
/// impl Variant for Lantern {
///     fn identifier(&self) -> Option<&str> {
///         Some("lantern")
///     }
/// }
///
/// static LANTERN: VariantEntry = variant_entry!(Lantern);
///
/// let mut registry = Registry::from_entries([&LANTERN], RegistryConfig::default());
/// assert!(registry.find::<Lantern>("lantern", None).is_some());
/// ```
#[macro_export]
macro_rules! variant_entry {
    ($ty:ty $(: $($kind:ty),+)?; order = $order:expr) => {
        $crate::VariantEntry {
            type_id: ::std::any::TypeId::of::<$ty>,
            class_name: $crate::variant::class_name_of::<$ty>,
            kinds: &[$($(::std::any::TypeId::of::<$kind> as fn() -> ::std::any::TypeId),+)?],
            order: $order,
            create: $crate::variant::instantiate::<$ty>,
        }
    };
    ($ty:ty $(: $($kind:ty),+)?) => {
        $crate::variant_entry!($ty $(: $($kind),+)?; order = 0)
    };
}

/// Registers a variant type so that [`Registry::discover`](crate::Registry::discover)
/// finds it.
///
/// Source order is not kept: discovered catalogs are sorted by `order`, then by
/// class name. Use `order = n` when one variant must come before another.
///
/// Accepts the same forms as [`variant_entry!`]:
///
/// ```rust
/// use unique_type_registry::{register_variant, Registry, Variant};
///
/// #[derive(Default)]
/// struct Enemy;
/// impl Variant for Enemy {
///     fn group(&self) -> &str {
///         "enemy"
///     }
/// }
///
/// #[derive(Default)]
/// struct Orc;
/// impl Variant for Orc {
///     fn identifier(&self) -> Option<&str> {
///         Some("Orc")
///     }
///     fn group(&self) -> &str {
///         "enemy"
///     }
/// }
///
/// register_variant!(Enemy; order = -1);
/// register_variant!(Orc: Enemy);
///
/// let mut registry = Registry::discover();
/// assert_eq!(registry.find_all::<Enemy>(None).len(), 1);
/// ```
#[macro_export]
macro_rules! register_variant {
    ($($spec:tt)+) => {
        $crate::inventory::submit! {
            $crate::variant_entry!($($spec)+)
        }
    };
}

/// Creates a process-wide registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static holding a lazily discovered [`Registry`](crate::Registry) (hidden)
/// - An `Api` struct that implements [`RegistryApi`](crate::RegistryApi)
/// - Free functions mirroring the registry operations
///
/// The registry starts on first use. An optional second argument supplies the
/// [`RegistryConfig`](crate::RegistryConfig); it is evaluated inside the
/// generated module, which glob-imports its parent.
///
/// # Examples
///
/// ```rust
/// use unique_type_registry::{define_registry, register_variant, Variant};
///
/// #[derive(Default)]
/// struct Boss;
/// impl Variant for Boss {
///     fn identifier(&self) -> Option<&str> {
///         Some("Boss")
///     }
///     fn implicit_instantiation(&self) -> bool {
///         false
///     }
/// }
///
/// register_variant!(Boss);
/// define_registry!(game);
///
/// assert!(game::find::<Boss>("Boss", None).is_none());
/// game::instantiate_implicits(None);
/// assert!(game::find::<Boss>("Boss", None).is_some());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        $crate::define_registry!($name, $crate::RegistryConfig::default());
    };
    ($name:ident, $config:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            use std::sync::{LazyLock, Mutex};

            // Storage for the registry (module-private)
            static STORAGE: LazyLock<Mutex<$crate::Registry>> =
                LazyLock::new(|| Mutex::new($crate::Registry::with_config($config)));

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `RegistryApi` trait's
            /// default implementations. This struct only provides access to the static.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn storage() -> &'static LazyLock<Mutex<$crate::Registry>> {
                    &STORAGE
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// Run `f` with exclusive access to the registry.
            pub fn with<R>(f: impl FnOnce(&mut $crate::Registry) -> R) -> R {
                $crate::RegistryApi::with(&API, f)
            }

            /// Find a variant of kind `K` by identifier.
            pub fn find<K: $crate::Variant + Default>(
                identifier: &str,
                group: Option<&str>,
            ) -> Option<$crate::VariantRef> {
                $crate::RegistryApi::find::<K>(&API, identifier, group)
            }

            /// Find a variant of kind `K`, reporting a miss as an error.
            pub fn require<K: $crate::Variant + Default>(
                identifier: &str,
                group: Option<&str>,
            ) -> Result<$crate::VariantRef, $crate::RegistryError> {
                $crate::RegistryApi::require::<K>(&API, identifier, group)
            }

            /// Every variant of kind `K` in a group.
            pub fn find_all<K: $crate::Variant + Default>(
                group: Option<&str>,
            ) -> Vec<$crate::VariantRef> {
                $crate::RegistryApi::find_all::<K>(&API, group)
            }

            /// Activate on-demand variants, optionally limited to a group.
            pub fn instantiate_implicits(group: Option<&str>) -> usize {
                $crate::RegistryApi::instantiate_implicits(&API, group)
            }

            /// Activate on-demand variants in the lookup group of `K`.
            pub fn instantiate_implicits_for<K: $crate::Variant + Default>() -> usize {
                $crate::RegistryApi::instantiate_implicits_for::<K>(&API)
            }

            /// Tear down implicitly instantiated variants, optionally limited to a group.
            pub fn destroy_implicits(group: Option<&str>) -> usize {
                $crate::RegistryApi::destroy_implicits(&API, group)
            }

            /// Tear down implicitly instantiated variants in the lookup group of `K`.
            pub fn destroy_implicits_for<K: $crate::Variant + Default>() -> usize {
                $crate::RegistryApi::destroy_implicits_for::<K>(&API)
            }

            /// Lookup names known since startup.
            pub fn known_identifiers() -> Vec<String> {
                $crate::RegistryApi::known_identifiers(&API)
            }

            /// Groups known since startup.
            pub fn known_groups() -> Vec<String> {
                $crate::RegistryApi::known_groups(&API)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                $crate::RegistryApi::set_trace_callback(&API, callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                $crate::RegistryApi::clear_trace_callback(&API)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Registry, RegistryConfig, Variant, VariantEntry};

    #[derive(Default)]
    struct Family;
    impl Variant for Family {}

    #[derive(Default)]
    struct Member;
    impl Variant for Member {
        fn identifier(&self) -> Option<&str> {
            Some("member")
        }
    }

    #[derive(Default)]
    struct Other;
    impl Variant for Other {
        fn identifier(&self) -> Option<&str> {
            Some("other")
        }
    }

    static MEMBER: VariantEntry = crate::variant_entry!(Member: Family, Other; order = 7);
    static PLAIN: VariantEntry = crate::variant_entry!(Other);

    #[test]
    fn test_variant_entry_forms() {
        assert_eq!(MEMBER.order, 7);
        assert_eq!(MEMBER.kinds.len(), 2);
        assert_eq!(PLAIN.order, 0);
        assert!(PLAIN.kinds.is_empty());
        assert_eq!(PLAIN.class_name(), "Other");
    }

    #[test]
    fn test_define_registry_macro() {
        define_registry!(empty_reg);

        // The library itself registers no variants.
        assert!(empty_reg::with(|registry| registry.is_empty()));
        assert!(empty_reg::find_all::<crate::AnyVariant>(None).is_empty());
        assert_eq!(empty_reg::instantiate_implicits(None), 0);
    }

    #[test]
    fn test_define_registry_with_config() {
        define_registry!(stale_reg, RegistryConfig::default().preserve_stale_caches());

        assert!(!stale_reg::with(|registry| registry.config().invalidate_on_mutation));
    }

    #[test]
    fn test_kinds_admit_lookups() {
        let mut registry = Registry::from_entries([&MEMBER], RegistryConfig::default());
        assert!(registry.find::<Family>("member", None).is_some());
        assert!(registry.find::<Other>("member", None).is_some());
    }
}
