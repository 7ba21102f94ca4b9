//! # Unique Type Registry
//!
//! A registry of self-registering variant types with cached lookup by
//! identifier and by group.
//!
//! Every registrable type implements [`Variant`] (plus `Default`) and registers
//! itself once with [`register_variant!`]. A [`Registry`] created with
//! [`Registry::discover`] instantiates each variant that opts into implicit
//! instantiation, runs its `on_construct` hook, and indexes it.
//!
//! ## Quick Start
//!
//! ```rust
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
//! struct Orc;
//! impl Variant for Orc {
//!     fn identifier(&self) -> Option<&str> {
//!         Some("Orc")
//!     }
//!     fn group(&self) -> &str {
//!         "enemy"
//!     }
//! }
//!
//! register_variant!(Enemy);
//! register_variant!(Orc: Enemy);
//!
//! let mut registry = Registry::discover();
//! let orc = registry.find::<Enemy>("Orc", None).unwrap();
//! assert!(orc.is::<Orc>());
//! assert!(orc.is_constructed());
//! ```
//!
//! ## Features
//!
//! - **Compile-time registration**: variants are collected with `inventory`, no runtime scanning
//! - **Kinds**: lookups are filtered by a variant family given as a type parameter
//! - **Memoised lookups**: hits are cached per kind, identifier and group
//! - **On-demand variants**: `instantiate_implicits` / `destroy_implicits` manage variants lazily
//! - **Tracing support**: `tracing` spans plus an optional callback receiving [`RegistryEvent`]s
//!
//! ## Main Items
//!
//! - [`Registry`] - Owned registry with explicit lifecycle
//! - [`define_registry!`] - Process-wide registry module, initialised on first use
//! - [`RegistryApi`] - Trait behind `define_registry!`
//! - [`RegistryConfig`] - Cache invalidation policy and trace callback

mod cache;
mod config;
mod entry;
mod handle;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;
pub mod variant;

pub use config::RegistryConfig;
pub use entry::{discovered, VariantEntry};
pub use handle::VariantRef;
pub use registry::Registry;
pub use registry_error::RegistryError;
pub use registry_event::{RegistryEvent, TraceCallback};
pub use registry_trait::RegistryApi;
pub use variant::{AnyVariant, AsAny, Variant, DEFAULT_GROUP};

#[doc(hidden)]
pub use inventory;
