// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Compose: runtime feature composition.
//!
//! This crate turns a resolved feature plan into live state on a host
//! instance. A [`CompositionManager`] instantiates one [`Feature`] per
//! active plan entry, batches the initial default-value wave into a single
//! host update request, and fans out every host lifecycle event to the
//! instances in declaration order.
//!
//! ## Property synchronization
//!
//! Each instance's [`FeatureCore`] keeps an internal value cache and writes
//! the host through a three-guard path (no-op / mirror / propagate) so that
//! host-driven and feature-driven writes converge with at most one update
//! request and never ping-pong. On the host's first update, externally
//! supplied host values win over feature defaults; afterwards, host changes
//! flow one way into the caches.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use trellis_compose::{BasicFeature, CompositionManager, FeatureCatalog, FeatureHost, Lifecycle};
//! use trellis_registry::{
//!     ComponentRegistry, FeatureDefinition, PropertyDecl, PropertyValue, TypeConfig,
//! };
//! use trellis_resolve::FeatureResolver;
//!
//! // A minimal host: named values plus counters for update requests.
//! #[derive(Default)]
//! struct Host {
//!     values: BTreeMap<&'static str, PropertyValue>,
//!     updates: usize,
//! }
//!
//! impl FeatureHost for Host {
//!     fn value(&self, name: &str) -> Option<&PropertyValue> {
//!         self.values.get(name)
//!     }
//!     fn set_value(&mut self, name: &'static str, value: PropertyValue) {
//!         self.values.insert(name, value);
//!     }
//!     fn has_field(&self, _name: &str) -> bool {
//!         false
//!     }
//!     fn request_update(&mut self, _name: &'static str, _old: Option<PropertyValue>) {
//!         self.updates += 1;
//!     }
//!     fn request_batch_update(&mut self) {
//!         self.updates += 1;
//!     }
//! }
//!
//! // Declare a feature type and a host class providing it.
//! let mut registry = ComponentRegistry::new();
//! let sizer = registry.register(
//!     "Sizer",
//!     TypeConfig::feature().property(
//!         "size",
//!         PropertyDecl::new().with_default(PropertyValue::new("small")),
//!     ),
//! );
//! let button = registry.register(
//!     "Button",
//!     TypeConfig::host().provide("sizer", FeatureDefinition::new(sizer)),
//! );
//!
//! let mut catalog = FeatureCatalog::new();
//! catalog.register(sizer, BasicFeature::ctor);
//!
//! // Compose onto a live host: the default wave costs one update request.
//! let resolver = FeatureResolver::new();
//! let mut host = Host::default();
//! let mut manager = CompositionManager::new(&mut host, button, &registry, &resolver, &catalog);
//! assert_eq!(host.updates, 1);
//! assert_eq!(host.values["size"].to::<&str>(), Some("small"));
//!
//! // First update reconciles; the feature cache now mirrors the host.
//! manager
//!     .dispatch(&mut host, &Lifecycle::Updated { changed: &["size"] })
//!     .unwrap();
//! let core = manager.feature("sizer").unwrap().core();
//! assert_eq!(core.read("size").and_then(|v| v.to::<&str>()), Some("small"));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod feature;
mod host;
mod instance;
mod lifecycle;
mod manager;

pub use feature::{BasicFeature, Feature, FeatureCatalog, FeatureCtor, HookError};
pub use host::FeatureHost;
pub use instance::{FeatureCore, UnknownProperty, WriteOutcome};
pub use lifecycle::Lifecycle;
pub use manager::{ComposeObserver, CompositionManager, NullComposeObserver};
