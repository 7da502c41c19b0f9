// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Registry: component type descriptors and feature metadata.
//!
//! This crate provides the declaration-time foundation for feature
//! composition: an explicit parent-pointer index over component types,
//! hierarchy markers bounding chain traversal, and the per-class metadata
//! (provide / configure / declared properties / styles) that the resolver in
//! `trellis_resolve` folds into a plan.
//!
//! ## Core Concepts
//!
//! ### Explicit hierarchy
//!
//! Inheritance is data, not language reflection: each registered type names
//! its parent and carries [`TypeMarkers`]. [`ComponentRegistry::chain`] walks
//! the parent pointers upward while the requested marker holds, yielding a
//! root-most-first chain.
//!
//! ### Declaration surface
//!
//! [`TypeConfig`] is the class-level declaration surface. `provide` makes a
//! feature available to a class and its descendants; `configure` overrides or
//! disables an inherited feature; `property` and `style` declare what a
//! feature class contributes to its instances.
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_registry::{
//!     ComponentRegistry, ConfigMap, ConfigValue, FeatureDefinition, PropertyDecl,
//!     PropertyValue, TypeConfig, TypeMarkers,
//! };
//!
//! let mut registry = ComponentRegistry::new();
//!
//! // A feature class with one reactive property.
//! let tooltip = registry.register(
//!     "Tooltip",
//!     TypeConfig::feature().property(
//!         "placement",
//!         PropertyDecl::new().with_default(PropertyValue::new("top")),
//!     ),
//! );
//!
//! // A host hierarchy providing it.
//! let base = registry.register(
//!     "BaseButton",
//!     TypeConfig::host().provide(
//!         "tooltip",
//!         FeatureDefinition::new(tooltip)
//!             .with_config(ConfigMap::from_iter([("delay", ConfigValue::Int(300))])),
//!     ),
//! );
//! let button = registry.register("Button", TypeConfig::host().parent(base));
//!
//! let chain = registry.chain(button, TypeMarkers::COMPOSABLE_HOST);
//! assert_eq!(chain.as_slice(), &[base, button]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod config;
mod decl;
mod id;
mod meta;
mod registry;
mod value;

pub use config::{ConfigMap, ConfigValue};
pub use decl::{DeclFlags, PropertyDecl, StyleBlock};
pub use id::{ComponentTypeId, TypeMarkers};
pub use meta::{ConfigureEntry, FeatureDefinition, FeatureMeta, PropertyOverride};
pub use registry::{ComponentRegistry, TypeChain, TypeConfig, TypeDescriptor};
pub use value::PropertyValue;
