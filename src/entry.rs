//! Static registration records for variant types.
//!
//! Each registrable type submits one [`VariantEntry`] through
//! [`register_variant!`](crate::register_variant). Entries are collected at link
//! time by `inventory` and turned into a catalog when a registry starts.

use std::any::TypeId;
use std::fmt;

use crate::variant::{AnyVariant, Variant};

/// Compile-time description of one registrable variant type.
///
/// Built by [`variant_entry!`](crate::variant_entry); the fields are public only
/// so the macro can produce a constant expression.
pub struct VariantEntry {
    /// `TypeId` of the variant type.
    pub type_id: fn() -> TypeId,
    /// Short type name, used for class-name matching.
    pub class_name: fn() -> &'static str,
    /// Families this variant belongs to, usable as lookup kinds.
    pub kinds: &'static [fn() -> TypeId],
    /// Sort key for discovered catalogs, ascending. Ties break on class name.
    pub order: i16,
    /// Creates a fresh instance.
    pub create: fn() -> Box<dyn Variant>,
}

inventory::collect!(VariantEntry);

impl VariantEntry {
    pub fn variant_type(&self) -> TypeId {
        (self.type_id)()
    }

    pub fn class_name(&self) -> &'static str {
        (self.class_name)()
    }

    pub fn create(&self) -> Box<dyn Variant> {
        (self.create)()
    }

    /// Whether lookups of kind `kind` may return this variant.
    pub fn admits(&self, kind: TypeId) -> bool {
        kind == TypeId::of::<AnyVariant>()
            || kind == self.variant_type()
            || self.kinds.iter().any(|k| k() == kind)
    }
}

impl fmt::Debug for VariantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantEntry")
            .field("class_name", &self.class_name())
            .field("kinds", &self.kinds.len())
            .field("order", &self.order)
            .finish()
    }
}

/// Every entry linked into the binary, in discovery order.
pub fn discovered() -> Vec<&'static VariantEntry> {
    let mut entries: Vec<&'static VariantEntry> = inventory::iter::<VariantEntry>
        .into_iter()
        .collect();
    entries.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.class_name().cmp(b.class_name()))
    });
    entries
}
