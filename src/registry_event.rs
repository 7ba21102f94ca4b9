use std::sync::Arc;

/// Events emitted by a registry during its lifecycle and lookups.
///
/// These events are passed to the tracing callback set via `set_trace_callback`
/// or `RegistryConfig::with_trace`.
///
/// # Examples
///
/// ```rust
/// use unique_type_registry::RegistryEvent;
///
/// let event = RegistryEvent::Construct { class_name: "Goblin" };
/// assert_eq!(event.to_string(), "construct { class_name: Goblin }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A catalog entry was inspected at startup.
    Discover {
        class_name: &'static str,
        /// Whether the instance was kept (implicit instantiation).
        retained: bool,
    },

    /// `on_construct` ran for a variant.
    Construct { class_name: &'static str },

    /// `on_destroy` ran for a variant.
    Destroy { class_name: &'static str },

    /// A lookup by identifier was served.
    Find {
        /// Short name of the kind used as filter
        kind: &'static str,
        identifier: String,
        found: bool,
        /// Whether the answer came from the lookup cache
        cached: bool,
    },

    /// A lookup by group was served.
    FindAll {
        kind: &'static str,
        group: Option<String>,
        count: usize,
        cached: bool,
    },

    /// Both lookup caches were emptied.
    CacheCleared {},

    /// The registry was shut down.
    Shutdown {},
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback must not call back into the registry that emitted the event.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

pub(crate) fn emit(trace: &Option<Arc<TraceCallback>>, event: RegistryEvent) {
    if let Some(callback) = trace {
        callback(&event);
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Discover {
                class_name,
                retained,
            } => {
                write!(
                    f,
                    "discover {{ class_name: {}, retained: {} }}",
                    class_name, retained
                )
            }
            RegistryEvent::Construct { class_name } => {
                write!(f, "construct {{ class_name: {} }}", class_name)
            }
            RegistryEvent::Destroy { class_name } => {
                write!(f, "destroy {{ class_name: {} }}", class_name)
            }
            RegistryEvent::Find {
                kind,
                identifier,
                found,
                cached,
            } => write!(
                f,
                "find {{ kind: {}, identifier: {}, found: {}, cached: {} }}",
                kind, identifier, found, cached
            ),
            RegistryEvent::FindAll {
                kind,
                group,
                count,
                cached,
            } => write!(
                f,
                "find_all {{ kind: {}, group: {}, count: {}, cached: {} }}",
                kind,
                group.as_deref().unwrap_or("<default>"),
                count,
                cached
            ),
            RegistryEvent::CacheCleared {} => write!(f, "Clearing the lookup caches"),
            RegistryEvent::Shutdown {} => write!(f, "Shutting down the Registry"),
        }
    }
}
