//! Shared handles to active variants.

use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::entry::VariantEntry;
use crate::variant::{class_name_of, Variant};
use crate::RegistryError;

struct Slot {
    entry: &'static VariantEntry,
    instance: Box<dyn Variant>,
    constructed: AtomicBool,
}

/// A cheaply clonable handle to a variant instance owned by a registry.
///
/// Handles stay valid after the variant is destroyed; [`VariantRef::is_constructed`]
/// then reports `false`.
#[derive(Clone)]
pub struct VariantRef {
    slot: Arc<Slot>,
}

impl VariantRef {
    pub(crate) fn new(entry: &'static VariantEntry, instance: Box<dyn Variant>) -> Self {
        Self {
            slot: Arc::new(Slot {
                entry,
                instance,
                constructed: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn entry(&self) -> &'static VariantEntry {
        self.slot.entry
    }

    pub(crate) fn variant_type(&self) -> TypeId {
        self.slot.entry.variant_type()
    }

    pub(crate) fn construct(&self) {
        self.slot.instance.on_construct();
        self.slot.constructed.store(true, Ordering::Release);
    }

    pub(crate) fn destroy(&self) {
        self.slot.instance.on_destroy();
        self.slot.constructed.store(false, Ordering::Release);
    }

    /// The variant as a trait object.
    pub fn variant(&self) -> &dyn Variant {
        &*self.slot.instance
    }

    /// Short type name of the variant.
    pub fn class_name(&self) -> &'static str {
        self.slot.entry.class_name()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.variant().identifier()
    }

    pub fn group(&self) -> &str {
        self.variant().group()
    }

    pub fn is_base_only(&self) -> bool {
        self.variant().base_only()
    }

    pub fn implicit_instantiation(&self) -> bool {
        self.variant().implicit_instantiation()
    }

    pub fn match_by_class_name(&self) -> bool {
        self.variant().match_by_class_name()
    }

    /// The name lookups compare against: the class name when the variant
    /// matches by class name, its identifier otherwise.
    pub fn lookup_name(&self) -> Option<&str> {
        if self.match_by_class_name() {
            Some(self.class_name())
        } else {
            self.identifier()
        }
    }

    /// `true` once `on_construct` has run and until `on_destroy` runs.
    pub fn is_constructed(&self) -> bool {
        self.slot.constructed.load(Ordering::Acquire)
    }

    pub fn is<T: Variant>(&self) -> bool {
        self.variant().as_any().is::<T>()
    }

    pub fn downcast_ref<T: Variant>(&self) -> Option<&T> {
        self.variant().as_any().downcast_ref::<T>()
    }

    /// Typed access to the variant.
    ///
    /// # Errors
    ///
    /// [`RegistryError::TypeMismatch`] when the variant is not a `T`.
    pub fn downcast<T: Variant>(&self) -> Result<&T, RegistryError> {
        self.downcast_ref::<T>()
            .ok_or_else(|| RegistryError::TypeMismatch {
                expected: class_name_of::<T>(),
                found: self.class_name(),
            })
    }

    /// Whether both handles point at the same instance.
    pub fn ptr_eq(&self, other: &VariantRef) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for VariantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRef")
            .field("class_name", &self.class_name())
            .field("identifier", &self.identifier())
            .field("group", &self.group())
            .field("constructed", &self.is_constructed())
            .finish()
    }
}
