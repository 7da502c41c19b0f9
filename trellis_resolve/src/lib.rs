// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Resolve: the feature resolution engine.
//!
//! This crate merges the provide/configure declarations layered across a
//! host class's ancestor chain into one immutable [`ResolvedFeatures`] plan:
//! which features are active, each one's fully merged configuration and
//! reactive-property set, and the concatenated style contribution.
//!
//! ## Resolution rules
//!
//! - A subclass's `provide` fully replaces an ancestor's definition for the
//!   same name — and is the only declaration that overrides an inherited
//!   disable.
//! - `configure` entries fold root-to-leaf: configs deep-merge (later keys
//!   win, nested maps merge recursively), property overrides fold key-wise,
//!   and `Disable` short-circuits.
//! - A feature's own class chain contributes properties and styles
//!   root-first, so a feature subtype overrides its supertype's
//!   declarations.
//! - Resolution never fails: missing metadata is an empty contribution and a
//!   configure entry for an unprovided name is inert.
//!
//! ## Memoization
//!
//! [`FeatureResolver`] caches one plan per class. The cache is write-once
//! and monotonic; resolving the same class twice returns the identical
//! [`Rc`](alloc::rc::Rc).
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_registry::{
//!     ComponentRegistry, ConfigMap, ConfigValue, ConfigureEntry, FeatureDefinition,
//!     TypeConfig,
//! };
//! use trellis_resolve::FeatureResolver;
//!
//! let mut registry = ComponentRegistry::new();
//! let tooltip = registry.register("Tooltip", TypeConfig::feature());
//!
//! let base = registry.register(
//!     "Base",
//!     TypeConfig::host().provide(
//!         "tooltip",
//!         FeatureDefinition::new(tooltip)
//!             .with_config(ConfigMap::from_iter([("delay", ConfigValue::Int(300))])),
//!     ),
//! );
//! let button = registry.register(
//!     "Button",
//!     TypeConfig::host().parent(base).configure(
//!         "tooltip",
//!         ConfigureEntry::new()
//!             .with_config(ConfigMap::from_iter([("delay", ConfigValue::Int(100))])),
//!     ),
//! );
//!
//! let resolver = FeatureResolver::new();
//! let plan = resolver.resolve(&registry, button);
//! assert_eq!(
//!     plan.feature("tooltip").unwrap().config().get("delay"),
//!     Some(&ConfigValue::Int(100)),
//! );
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod observer;
mod plan;
mod resolve;

pub use observer::{DropReason, NullObserver, RecordingObserver, ResolveEvent, ResolveObserver};
pub use plan::{ResolvedFeature, ResolvedFeatures};
pub use resolve::FeatureResolver;
