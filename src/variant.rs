//! The `Variant` trait implemented by every registrable type.
//!
//! A variant describes itself through a handful of metadata methods (all with
//! defaults) and may react to being constructed or destroyed by the registry.
//! Metadata is read from a fresh `Default` instance at discovery time, so it
//! should not depend on runtime state.

use std::any::{type_name, Any};

/// Group assigned to variants that do not name one.
pub const DEFAULT_GROUP: &str = "base";

/// Upcast helper so registry handles can downcast to the concrete variant.
///
/// Implemented for every `'static` type; there is no reason to implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A registrable implementation type.
///
/// To be registrable a type must also implement `Default`; the registry uses
/// it to create instances, both the ones it keeps and the transient ones it
/// only inspects for metadata.
///
/// # Examples
///
/// ```rust
/// use unique_type_registry::Variant;
///
/// #[derive(Default)]
/// struct Goblin;
///
/// impl Variant for Goblin {
///     fn identifier(&self) -> Option<&str> {
///         Some("Goblin")
///     }
///
///     fn group(&self) -> &str {
///         "enemy"
///     }
/// }
///
/// assert!(!Goblin.base_only());
/// assert!(Goblin.implicit_instantiation());
/// ```
pub trait Variant: AsAny + Send + Sync {
    /// Name the variant is looked up by. `None` keeps it out of identifier indexing.
    fn identifier(&self) -> Option<&str> {
        None
    }

    /// Group the variant is listed under.
    fn group(&self) -> &str {
        DEFAULT_GROUP
    }

    /// Hide the variant from `find`, `find_all` and the known identifiers.
    ///
    /// Defaults to `true` exactly when there is no identifier.
    fn base_only(&self) -> bool {
        self.identifier().is_none()
    }

    /// Match lookups against the short type name instead of [`Variant::identifier`].
    fn match_by_class_name(&self) -> bool {
        false
    }

    /// Create this variant when the registry starts.
    ///
    /// When `false` the variant only becomes active through
    /// `Registry::instantiate_implicits`.
    fn implicit_instantiation(&self) -> bool {
        true
    }

    /// Group searched when this type is the kind of a lookup that names no group.
    fn lookup_group(&self) -> Option<&str> {
        Some(self.group())
    }

    /// Called once the registry has made this instance active.
    fn on_construct(&self) {}

    /// Called right before the registry drops this instance from the active set.
    fn on_destroy(&self) {}
}

/// Kind that admits every variant and searches every group.
///
/// Use it when a lookup should not be restricted to a family:
///
/// ```rust
/// use unique_type_registry::{AnyVariant, Registry, RegistryConfig};
///
/// let mut registry = Registry::from_entries([], RegistryConfig::default());
/// assert!(registry.find::<AnyVariant>("Goblin", None).is_none());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyVariant;

impl Variant for AnyVariant {
    fn lookup_group(&self) -> Option<&str> {
        None
    }
}

/// Short type name of `T`, without module path or generic arguments.
pub fn class_name_of<T: ?Sized>() -> &'static str {
    short_type_name(type_name::<T>())
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Factory stored in a `VariantEntry`.
pub fn instantiate<T: Variant + Default>() -> Box<dyn Variant> {
    Box::new(T::default())
}
