// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component type registry and chain walking.
//!
//! The registry is an explicit parent-pointer index over component types:
//! each registered type records its parent, its hierarchy markers, and the
//! metadata it contributes to resolution. Chain walking is a plain traversal
//! over this index — no runtime type introspection is involved.

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::decl::{PropertyDecl, StyleBlock};
use crate::id::{ComponentTypeId, TypeMarkers};
use crate::meta::{ConfigureEntry, FeatureDefinition, FeatureMeta};

/// Inline capacity for ancestor chains.
///
/// Component hierarchies are shallow in practice; eight levels covers the
/// common case without heap allocation.
const CHAIN_CAPACITY: usize = 8;

/// An ancestor chain, ordered root-most first.
pub type TypeChain = SmallVec<[ComponentTypeId; CHAIN_CAPACITY]>;

/// A registration entry for a component type.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    name: &'static str,
    parent: Option<ComponentTypeId>,
    markers: TypeMarkers,
    meta: FeatureMeta,
    styles: Vec<StyleBlock>,
}

impl TypeDescriptor {
    /// Returns the type name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the parent type, if any.
    #[must_use]
    #[inline]
    pub fn parent(&self) -> Option<ComponentTypeId> {
        self.parent
    }

    /// Returns the hierarchy markers.
    #[must_use]
    #[inline]
    pub fn markers(&self) -> TypeMarkers {
        self.markers
    }

    /// Returns the metadata this type contributes to resolution.
    #[must_use]
    #[inline]
    pub fn meta(&self) -> &FeatureMeta {
        &self.meta
    }

    /// Returns the style blocks declared on this type.
    #[must_use]
    #[inline]
    pub fn styles(&self) -> &[StyleBlock] {
        &self.styles
    }
}

/// Declaration-time configuration for a type registration.
///
/// This is the class-level declaration surface: provide, configure, declared
/// reactive properties, and styles all funnel through it into the registered
/// type's [`FeatureMeta`].
///
/// # Example
///
/// ```rust
/// use trellis_registry::{
///     ComponentRegistry, FeatureDefinition, PropertyDecl, TypeConfig, TypeMarkers,
/// };
///
/// let mut registry = ComponentRegistry::new();
///
/// let tooltip = registry.register(
///     "Tooltip",
///     TypeConfig::feature().property("placement", PropertyDecl::new()),
/// );
///
/// let button = registry.register(
///     "Button",
///     TypeConfig::host().provide("tooltip", FeatureDefinition::new(tooltip)),
/// );
///
/// assert!(registry.markers(button).contains(TypeMarkers::COMPOSABLE_HOST));
/// assert_eq!(registry.name(tooltip), Some("Tooltip"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TypeConfig {
    parent: Option<ComponentTypeId>,
    markers: TypeMarkers,
    meta: FeatureMeta,
    styles: Vec<StyleBlock>,
}

impl TypeConfig {
    /// Creates a configuration with no markers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration marked as a composable host.
    #[must_use]
    pub fn host() -> Self {
        Self::new().markers(TypeMarkers::COMPOSABLE_HOST)
    }

    /// Creates a configuration marked as a feature.
    #[must_use]
    pub fn feature() -> Self {
        Self::new().markers(TypeMarkers::FEATURE)
    }

    /// Adds hierarchy markers.
    #[must_use]
    pub fn markers(mut self, markers: TypeMarkers) -> Self {
        self.markers |= markers;
        self
    }

    /// Sets the parent type.
    #[must_use]
    pub fn parent(mut self, parent: ComponentTypeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declares a provided feature.
    #[must_use]
    pub fn provide(mut self, name: &'static str, definition: FeatureDefinition) -> Self {
        self.meta.provide(name, definition);
        self
    }

    /// Declares a configure override.
    #[must_use]
    pub fn configure(mut self, name: &'static str, entry: ConfigureEntry) -> Self {
        self.meta.configure(name, entry);
        self
    }

    /// Declares a reactive property.
    #[must_use]
    pub fn property(mut self, name: &'static str, decl: PropertyDecl) -> Self {
        self.meta.declare_property(name, decl);
        self
    }

    /// Declares a style block.
    #[must_use]
    pub fn style(mut self, block: StyleBlock) -> Self {
        self.styles.push(block);
        self
    }
}

/// A registry of component types.
///
/// Types are registered once at startup, and the registry provides lookup by
/// name or ID, access to metadata, and marker-bounded chain walking.
///
/// # Example
///
/// ```rust
/// use trellis_registry::{ComponentRegistry, TypeConfig, TypeMarkers};
///
/// let mut registry = ComponentRegistry::new();
///
/// let base = registry.register("BaseCard", TypeConfig::host());
/// let card = registry.register("Card", TypeConfig::host().parent(base));
///
/// let chain = registry.chain(card, TypeMarkers::COMPOSABLE_HOST);
/// assert_eq!(chain.as_slice(), &[base, card]);
/// ```
#[derive(Default)]
pub struct ComponentRegistry {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<&'static str, ComponentTypeId>,
}

impl ComponentRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new component type.
    ///
    /// Returns a [`ComponentTypeId`] handle for the type.
    ///
    /// # Panics
    ///
    /// Panics if a type with the same name is already registered, or if more
    /// than 65,536 types are registered.
    pub fn register(&mut self, name: &'static str, config: TypeConfig) -> ComponentTypeId {
        assert!(
            !self.by_name.contains_key(name),
            "Type '{name}' is already registered"
        );
        assert!(
            self.types.len() < u16::MAX as usize,
            "Too many types registered (max {})",
            u16::MAX
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = ComponentTypeId::new(self.types.len() as u16);

        self.types.push(TypeDescriptor {
            name,
            parent: config.parent,
            markers: config.markers,
            meta: config.meta,
            styles: config.styles,
        });
        self.by_name.insert(name, id);

        id
    }

    /// Returns the number of registered types.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ComponentTypeId> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a type.
    #[must_use]
    pub fn name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.types.get(id.index() as usize).map(|d| d.name)
    }

    /// Returns the descriptor for a type.
    #[must_use]
    pub fn get(&self, id: ComponentTypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.index() as usize)
    }

    /// Returns the parent of a type.
    #[must_use]
    pub fn parent(&self, id: ComponentTypeId) -> Option<ComponentTypeId> {
        self.get(id).and_then(TypeDescriptor::parent)
    }

    /// Returns the markers of a type. Unregistered IDs have no markers.
    #[must_use]
    pub fn markers(&self, id: ComponentTypeId) -> TypeMarkers {
        self.get(id).map(TypeDescriptor::markers).unwrap_or_default()
    }

    /// Returns the metadata of a type.
    #[must_use]
    pub fn meta(&self, id: ComponentTypeId) -> Option<&FeatureMeta> {
        self.get(id).map(TypeDescriptor::meta)
    }

    /// Returns the style blocks of a type.
    #[must_use]
    pub fn styles(&self, id: ComponentTypeId) -> &[StyleBlock] {
        self.get(id).map(TypeDescriptor::styles).unwrap_or(&[])
    }

    /// Returns an iterator over all registered types.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentTypeId, &TypeDescriptor)> {
        self.types.iter().enumerate().map(|(i, d)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            (ComponentTypeId::new(i as u16), d)
        })
    }

    /// Returns the ancestor chain of `id`, root-most first, bounded by
    /// `marker`.
    ///
    /// The chain always includes `id` itself, then extends upward through
    /// ancestors that carry `marker`, stopping at the first ancestor that
    /// does not — further unmarked ancestors are never visited. A type with
    /// no marked ancestors yields a chain of length 1.
    #[must_use]
    pub fn chain(&self, id: ComponentTypeId, marker: TypeMarkers) -> TypeChain {
        let mut chain = TypeChain::new();
        chain.push(id);

        let mut current = self.parent(id);
        while let Some(parent) = current {
            let Some(descriptor) = self.get(parent) else {
                break;
            };
            if !descriptor.markers().contains(marker) {
                break;
            }
            chain.push(parent);
            current = descriptor.parent();
        }

        chain.reverse();
        chain
    }
}

impl core::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("count", &self.types.len())
            .field("types", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}
