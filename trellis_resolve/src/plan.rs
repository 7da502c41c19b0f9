// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved feature plans.
//!
//! A plan is the frozen output of resolution: which features are active on a
//! host class, each one's fully merged configuration and property set, and
//! the flattened property/style contribution the host merges into its own
//! static declarations. Plans are immutable after construction and shared
//! per class behind an [`Rc`](alloc::rc::Rc).

use alloc::vec::Vec;

use trellis_registry::{ComponentTypeId, ConfigMap, PropertyDecl, StyleBlock};

/// One active feature in a resolved plan.
#[derive(Clone, Debug)]
pub struct ResolvedFeature {
    pub(crate) name: &'static str,
    pub(crate) class: ComponentTypeId,
    pub(crate) config: ConfigMap,
    pub(crate) properties: Vec<(&'static str, PropertyDecl)>,
    pub(crate) styles: Vec<StyleBlock>,
}

impl ResolvedFeature {
    /// Returns the feature name it was provided under.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the feature's implementation class.
    #[must_use]
    #[inline]
    pub fn class(&self) -> ComponentTypeId {
        self.class
    }

    /// Returns the fully merged configuration.
    #[must_use]
    #[inline]
    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Returns this feature's own merged property declarations.
    ///
    /// This is the per-feature set (feature chain plus configure overrides),
    /// independent of the plan's flattened union. Order follows the feature
    /// chain, root-most declarations first.
    #[must_use]
    #[inline]
    pub fn properties(&self) -> &[(&'static str, PropertyDecl)] {
        &self.properties
    }

    /// Returns the declaration for one of this feature's properties.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, decl)| decl)
    }

    /// Returns this feature's style blocks in chain order.
    #[must_use]
    #[inline]
    pub fn styles(&self) -> &[StyleBlock] {
        &self.styles
    }
}

/// The frozen resolution result for one host class.
///
/// Contains exactly one entry per feature name that is provided somewhere in
/// the chain and not disabled anywhere in it. Iteration order of
/// [`features`](Self::features) is declaration order: the insertion order of
/// the resolution walk, with a re-provide keeping its original position.
#[derive(Clone, Debug, Default)]
pub struct ResolvedFeatures {
    pub(crate) features: Vec<ResolvedFeature>,
    pub(crate) properties: Vec<(&'static str, PropertyDecl)>,
    pub(crate) styles: Vec<StyleBlock>,
}

impl ResolvedFeatures {
    /// Returns the active features in declaration order.
    #[must_use]
    #[inline]
    pub fn features(&self) -> &[ResolvedFeature] {
        &self.features
    }

    /// Returns the active feature with the given name.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&ResolvedFeature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Returns the number of active features.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if no features are active.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the flattened property union across all active features.
    ///
    /// Feature property namespaces are assumed disjoint; on a collision the
    /// later feature wins and the earlier declaration is dropped (reported
    /// through the resolve observer).
    #[must_use]
    #[inline]
    pub fn properties(&self) -> &[(&'static str, PropertyDecl)] {
        &self.properties
    }

    /// Returns the flattened declaration for a property name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, decl)| decl)
    }

    /// Returns all active features' style blocks, concatenated in
    /// declaration order.
    #[must_use]
    #[inline]
    pub fn styles(&self) -> &[StyleBlock] {
        &self.styles
    }
}
