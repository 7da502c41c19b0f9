// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The feature capability interface.
//!
//! A feature implements [`Feature`]: access to its [`FeatureCore`] plus any
//! subset of a fixed set of lifecycle hooks. Dispatch is a plain method call
//! on the trait — the composition manager never routes by hook name, and a
//! hook a feature does not override is a no-op.
//!
//! Feature instances are created through constructors registered in a
//! [`FeatureCatalog`], keyed by the feature's component type.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use hashbrown::HashMap;
use trellis_registry::{ComponentRegistry, ComponentTypeId, TypeMarkers};

use crate::host::FeatureHost;
use crate::instance::FeatureCore;

/// Error raised by a feature lifecycle hook.
///
/// Hook errors are not isolated: the composition manager stops the dispatch
/// pass at the first error and propagates it to the host's own lifecycle
/// call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookError {
    feature: &'static str,
    message: String,
}

impl HookError {
    /// Creates a hook error for the named feature.
    #[must_use]
    pub fn new(feature: &'static str, message: impl Into<String>) -> Self {
        Self {
            feature,
            message: message.into(),
        }
    }

    /// Returns the feature whose hook failed.
    #[must_use]
    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature `{}` hook failed: {}", self.feature, self.message)
    }
}

impl core::error::Error for HookError {}

/// A composable feature instance.
///
/// Every feature owns a [`FeatureCore`] and may override any subset of the
/// lifecycle hooks; the defaults do nothing. Hooks receive the host by
/// reference on each call — features hold no reference back to it.
///
/// # Example
///
/// ```rust
/// use trellis_compose::{Feature, FeatureCore, FeatureHost, HookError};
/// use trellis_registry::PropertyValue;
///
/// struct Spinner {
///     core: FeatureCore,
/// }
///
/// impl Feature for Spinner {
///     fn core(&self) -> &FeatureCore {
///         &self.core
///     }
///
///     fn core_mut(&mut self) -> &mut FeatureCore {
///         &mut self.core
///     }
///
///     fn host_connected(&mut self, host: &mut dyn FeatureHost) -> Result<(), HookError> {
///         self.core
///             .write(host, "spinning", PropertyValue::new(true))
///             .map_err(|e| HookError::new(self.core.name(), e.to_string()))?;
///         Ok(())
///     }
/// }
/// ```
pub trait Feature {
    /// Returns the instance state.
    fn core(&self) -> &FeatureCore;

    /// Returns the instance state mutably.
    fn core_mut(&mut self) -> &mut FeatureCore;

    /// Called when the host connects.
    fn host_connected(&mut self, _host: &mut dyn FeatureHost) -> Result<(), HookError> {
        Ok(())
    }

    /// Called when the host disconnects.
    fn host_disconnected(&mut self, _host: &mut dyn FeatureHost) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before each host update with the changed property names.
    fn before_update(
        &mut self,
        _host: &mut dyn FeatureHost,
        _changed: &[&'static str],
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after the host's first update, once reconciliation has run.
    fn first_updated(
        &mut self,
        _host: &mut dyn FeatureHost,
        _changed: &[&'static str],
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after every host update after the first.
    fn updated(
        &mut self,
        _host: &mut dyn FeatureHost,
        _changed: &[&'static str],
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called when a host attribute changes.
    fn attribute_changed(
        &mut self,
        _host: &mut dyn FeatureHost,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// Constructor for a feature instance, registered per feature type.
///
/// Receives the prepared [`FeatureCore`] (name, instance-local config, and
/// declared property set from the resolved plan) and returns the boxed
/// instance.
pub type FeatureCtor = fn(FeatureCore) -> Box<dyn Feature>;

/// A feature with no hook overrides.
///
/// Sufficient for features whose whole contribution is declarative:
/// properties, defaults, styles, and configuration.
#[derive(Debug)]
pub struct BasicFeature {
    core: FeatureCore,
}

impl BasicFeature {
    /// The [`FeatureCtor`] for this type.
    #[must_use]
    pub fn ctor(core: FeatureCore) -> Box<dyn Feature> {
        Box::new(Self { core })
    }
}

impl Feature for BasicFeature {
    fn core(&self) -> &FeatureCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FeatureCore {
        &mut self.core
    }
}

/// Maps feature types to their instance constructors.
///
/// The catalog is runtime-side companion data to the registry: the registry
/// describes what a feature type declares, the catalog knows how to build an
/// instance of it. Lookup falls back through the feature chain, so a feature
/// subtype that registers no constructor of its own inherits the nearest
/// ancestor's.
///
/// # Example
///
/// ```rust
/// use trellis_compose::{BasicFeature, FeatureCatalog};
/// use trellis_registry::{ComponentRegistry, TypeConfig};
///
/// let mut registry = ComponentRegistry::new();
/// let overlay = registry.register("Overlay", TypeConfig::feature());
/// let popover = registry.register("Popover", TypeConfig::feature().parent(overlay));
///
/// let mut catalog = FeatureCatalog::new();
/// catalog.register(overlay, BasicFeature::ctor);
///
/// // Popover falls back to Overlay's constructor.
/// assert!(catalog.ctor_for(&registry, popover).is_some());
/// ```
#[derive(Debug, Default)]
pub struct FeatureCatalog {
    ctors: HashMap<ComponentTypeId, FeatureCtor>,
}

impl FeatureCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the constructor for a feature type, replacing any previous
    /// registration.
    pub fn register(&mut self, class: ComponentTypeId, ctor: FeatureCtor) {
        self.ctors.insert(class, ctor);
    }

    /// Returns the constructor registered directly on a type.
    #[must_use]
    pub fn get(&self, class: ComponentTypeId) -> Option<FeatureCtor> {
        self.ctors.get(&class).copied()
    }

    /// Returns the constructor for a type, falling back leaf-to-root through
    /// its feature chain.
    #[must_use]
    pub fn ctor_for(
        &self,
        registry: &ComponentRegistry,
        class: ComponentTypeId,
    ) -> Option<FeatureCtor> {
        registry
            .chain(class, TypeMarkers::FEATURE)
            .iter()
            .rev()
            .find_map(|&link| self.get(link))
    }

    /// Returns the number of registered constructors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    /// Returns `true` if no constructors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }
}
