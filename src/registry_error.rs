use thiserror::Error;

/// Errors reported by the fallible registry surfaces.
///
/// Plain lookups never fail; `find` and `find_all` report misses as `None` or
/// an empty `Vec`.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Failed to acquire registry lock")]
    RegistryLock,
    #[error("Type mismatch in registry: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Variant not found in registry: {identifier} (group: {})", .group.as_deref().unwrap_or("<default>"))]
    VariantNotFound {
        identifier: String,
        group: Option<String>,
    },
}
