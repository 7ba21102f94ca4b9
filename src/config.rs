//! Registry configuration.

use std::fmt;
use std::sync::Arc;

use crate::{RegistryEvent, TraceCallback};

/// Settings applied when a registry is created.
///
/// ```rust
/// use unique_type_registry::RegistryConfig;
///
/// let config = RegistryConfig::default()
///     .preserve_stale_caches()
///     .with_trace(|event| println!("[registry-trace] {event}"));
/// assert!(!config.invalidate_on_mutation);
/// ```
#[derive(Clone)]
pub struct RegistryConfig {
    /// Clear the lookup caches whenever instantiate/destroy changes the active set.
    ///
    /// When `false`, cached positions outlive the mutation and may resolve to a
    /// different variant than the one originally found. A cache hit is returned
    /// as is: the variant now at that position is not re-checked, so it may be
    /// base-only, belong to another group or fall outside the requested kind. A
    /// cached position past the end of the active set is dropped and the key is
    /// looked up again.
    pub invalidate_on_mutation: bool,
    /// Callback receiving every [`RegistryEvent`], including discovery.
    pub trace: Option<Arc<TraceCallback>>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            invalidate_on_mutation: true,
            trace: None,
        }
    }
}

impl RegistryConfig {
    /// Keep cached lookups across instantiate/destroy calls.
    pub fn preserve_stale_caches(mut self) -> Self {
        self.invalidate_on_mutation = false;
        self
    }

    pub fn with_trace(mut self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) -> Self {
        self.trace = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("invalidate_on_mutation", &self.invalidate_on_mutation)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
