// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-class feature metadata.
//!
//! Each registered class owns one [`FeatureMeta`]: the features it provides,
//! the configure overrides it layers on inherited features, and the reactive
//! properties it declares. Classes never mutate each other's metadata; the
//! resolver folds the containers across a chain at resolution time.

use alloc::vec::Vec;

use crate::config::ConfigMap;
use crate::decl::PropertyDecl;
use crate::id::ComponentTypeId;

/// A provided feature: its implementation class and default configuration.
///
/// Immutable once stored on a class. A subclass re-providing the same
/// feature name fully replaces the ancestor's definition.
///
/// # Example
///
/// ```rust
/// use trellis_registry::{ComponentTypeId, ConfigMap, ConfigValue, FeatureDefinition};
///
/// let tooltip_class = ComponentTypeId::new(7);
/// let def = FeatureDefinition::new(tooltip_class)
///     .with_config(ConfigMap::from_iter([("delay", ConfigValue::Int(300))]))
///     .enabled(true);
///
/// assert_eq!(def.class(), tooltip_class);
/// assert_eq!(def.enabled_flag(), Some(true));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureDefinition {
    class: ComponentTypeId,
    config: Option<ConfigMap>,
    enabled: Option<bool>,
}

impl FeatureDefinition {
    /// Creates a definition for the given feature class with no default
    /// configuration and no explicit enabled flag.
    #[must_use]
    pub fn new(class: ComponentTypeId) -> Self {
        Self {
            class,
            config: None,
            enabled: None,
        }
    }

    /// Sets the default configuration.
    #[must_use]
    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the explicit enabled flag.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Returns the feature's implementation class.
    #[must_use]
    #[inline]
    pub fn class(&self) -> ComponentTypeId {
        self.class
    }

    /// Returns the default configuration, if any.
    #[must_use]
    #[inline]
    pub fn config(&self) -> Option<&ConfigMap> {
        self.config.as_ref()
    }

    /// Returns the explicit enabled flag, if set.
    #[must_use]
    #[inline]
    pub fn enabled_flag(&self) -> Option<bool> {
        self.enabled
    }
}

/// A per-property override inside a [`ConfigureEntry`].
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyOverride {
    /// Remove the property from the feature's resolved set.
    Disable,
    /// Replace or insert the property declaration.
    Declare(PropertyDecl),
}

/// An override layered on top of an inherited or provided feature.
///
/// Entries fold root-to-leaf across the chain via [`ConfigureEntry::merge_onto`]:
/// configs deep-merge, property overrides replace key-wise, and `Disable` is
/// sticky — once a level disables the feature, later configure entries do not
/// re-enable it (only a fresh `provide` does).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigureEntry {
    /// Disable the feature entirely at this level.
    Disable,
    /// Partial reconfiguration of config and/or properties.
    Override {
        /// Config overlay, deep-merged onto the accumulated config.
        config: Option<ConfigMap>,
        /// Key-wise property overrides, later same-key entries replacing.
        properties: Vec<(&'static str, PropertyOverride)>,
    },
}

impl ConfigureEntry {
    /// Creates an empty override entry.
    #[must_use]
    pub fn new() -> Self {
        Self::Override {
            config: None,
            properties: Vec::new(),
        }
    }

    /// Adds a config overlay to this entry.
    ///
    /// No-op on the `Disable` variant.
    #[must_use]
    pub fn with_config(mut self, overlay: ConfigMap) -> Self {
        if let Self::Override { config, .. } = &mut self {
            match config {
                Some(existing) => existing.merge_from(&overlay),
                None => *config = Some(overlay),
            }
        }
        self
    }

    /// Adds a property override to this entry.
    ///
    /// No-op on the `Disable` variant.
    #[must_use]
    pub fn with_property(mut self, name: &'static str, property: PropertyOverride) -> Self {
        if let Self::Override { properties, .. } = &mut self {
            match properties.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = property,
                None => properties.push((name, property)),
            }
        }
        self
    }

    /// Folds `next` onto this accumulated entry.
    ///
    /// `Disable` short-circuits: if either side is `Disable`, the result is
    /// `Disable`. Otherwise configs deep-merge and property overrides fold
    /// key-wise with later entries replacing.
    pub fn merge_onto(&mut self, next: &Self) {
        let Self::Override {
            config: next_config,
            properties: next_properties,
        } = next
        else {
            *self = Self::Disable;
            return;
        };
        let Self::Override { config, properties } = self else {
            // Accumulated Disable is sticky.
            return;
        };
        if let Some(overlay) = next_config {
            match config {
                Some(existing) => existing.merge_from(overlay),
                None => *config = Some(overlay.clone()),
            }
        }
        for &(name, ref property) in next_properties {
            match properties.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = property.clone(),
                None => properties.push((name, property.clone())),
            }
        }
    }
}

impl Default for ConfigureEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// The metadata a single class contributes to feature resolution.
///
/// Three independent containers: provided features, configure overrides, and
/// declared reactive properties. Provide and configure entries keep insertion
/// order; the resolver's declaration-order guarantee derives from it.
#[derive(Clone, Debug, Default)]
pub struct FeatureMeta {
    provides: Vec<(&'static str, FeatureDefinition)>,
    configures: Vec<(&'static str, ConfigureEntry)>,
    properties: Vec<(&'static str, PropertyDecl)>,
}

impl FeatureMeta {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no metadata has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provides.is_empty() && self.configures.is_empty() && self.properties.is_empty()
    }

    /// Records a provided feature. A repeat for the same name replaces the
    /// definition in place.
    pub fn provide(&mut self, name: &'static str, definition: FeatureDefinition) {
        match self.provides.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = definition,
            None => self.provides.push((name, definition)),
        }
    }

    /// Records a configure override. A repeat for the same name folds onto
    /// the existing entry via [`ConfigureEntry::merge_onto`].
    pub fn configure(&mut self, name: &'static str, entry: ConfigureEntry) {
        match self.configures.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1.merge_onto(&entry),
            None => self.configures.push((name, entry)),
        }
    }

    /// Records a declared reactive property. A repeat for the same name
    /// replaces the declaration in place.
    pub fn declare_property(&mut self, name: &'static str, decl: PropertyDecl) {
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = decl,
            None => self.properties.push((name, decl)),
        }
    }

    /// Returns the provided features in insertion order.
    #[must_use]
    pub fn provides(&self) -> &[(&'static str, FeatureDefinition)] {
        &self.provides
    }

    /// Returns the configure overrides in insertion order.
    #[must_use]
    pub fn configures(&self) -> &[(&'static str, ConfigureEntry)] {
        &self.configures
    }

    /// Returns the declared reactive properties in insertion order.
    #[must_use]
    pub fn properties(&self) -> &[(&'static str, PropertyDecl)] {
        &self.properties
    }
}
