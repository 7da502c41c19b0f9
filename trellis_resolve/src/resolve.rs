// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The feature resolution engine.
//!
//! [`FeatureResolver::resolve`] folds every provide/configure declaration
//! across a host class's ancestor chain into one frozen
//! [`ResolvedFeatures`] plan, memoized per class.
//!
//! Resolution never fails: absent metadata is an empty contribution, and a
//! configure entry for a name nothing provides is inert.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

use trellis_registry::{
    ComponentRegistry, ComponentTypeId, ConfigureEntry, FeatureDefinition, PropertyDecl,
    PropertyOverride, TypeMarkers,
};

use crate::observer::{DropReason, NullObserver, ResolveObserver};
use crate::plan::{ResolvedFeature, ResolvedFeatures};

/// Resolves host classes to feature plans, memoizing per class.
///
/// The cache is write-once and monotonic: a class is resolved at most once
/// for the resolver's lifetime, and every later call returns the identical
/// [`Rc`] (observable via [`Rc::ptr_eq`]).
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use trellis_registry::{
///     ComponentRegistry, ConfigMap, ConfigValue, FeatureDefinition, TypeConfig,
/// };
/// use trellis_resolve::FeatureResolver;
///
/// let mut registry = ComponentRegistry::new();
/// let tooltip = registry.register("Tooltip", TypeConfig::feature());
/// let button = registry.register(
///     "Button",
///     TypeConfig::host().provide(
///         "tooltip",
///         FeatureDefinition::new(tooltip)
///             .with_config(ConfigMap::from_iter([("delay", ConfigValue::Int(300))])),
///     ),
/// );
///
/// let resolver = FeatureResolver::new();
/// let plan = resolver.resolve(&registry, button);
/// assert_eq!(plan.len(), 1);
/// assert_eq!(
///     plan.feature("tooltip").unwrap().config().get("delay"),
///     Some(&ConfigValue::Int(300)),
/// );
///
/// // Memoized: the same class resolves to the identical plan.
/// assert!(Rc::ptr_eq(&plan, &resolver.resolve(&registry, button)));
/// ```
#[derive(Default)]
pub struct FeatureResolver {
    cache: RefCell<HashMap<ComponentTypeId, Rc<ResolvedFeatures>>>,
}

impl FeatureResolver {
    /// Creates a resolver with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the class has already been resolved.
    #[must_use]
    pub fn is_resolved(&self, class: ComponentTypeId) -> bool {
        self.cache.borrow().contains_key(&class)
    }

    /// Returns the number of classes resolved so far.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Resolves the feature plan for a host class.
    ///
    /// See [`resolve_with`](Self::resolve_with) for the observed variant.
    #[must_use]
    pub fn resolve(
        &self,
        registry: &ComponentRegistry,
        class: ComponentTypeId,
    ) -> Rc<ResolvedFeatures> {
        self.resolve_with(registry, class, &mut NullObserver)
    }

    /// Resolves the feature plan for a host class, reporting diagnostics to
    /// `observer`.
    ///
    /// A cache hit returns the stored plan without observer callbacks; the
    /// plan for a class is built at most once.
    pub fn resolve_with(
        &self,
        registry: &ComponentRegistry,
        class: ComponentTypeId,
        observer: &mut dyn ResolveObserver,
    ) -> Rc<ResolvedFeatures> {
        if let Some(hit) = self.cache.borrow().get(&class) {
            return Rc::clone(hit);
        }

        let plan = Rc::new(build_plan(registry, class, observer));
        self.cache.borrow_mut().insert(class, Rc::clone(&plan));
        plan
    }
}

impl core::fmt::Debug for FeatureResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeatureResolver")
            .field("resolved", &self.cache.borrow().len())
            .finish()
    }
}

/// Folds the host chain's metadata and assembles the frozen plan.
fn build_plan(
    registry: &ComponentRegistry,
    class: ComponentTypeId,
    observer: &mut dyn ResolveObserver,
) -> ResolvedFeatures {
    let chain = registry.chain(class, TypeMarkers::COMPOSABLE_HOST);

    // Fold provides and configures root-to-leaf. A provide fully replaces an
    // ancestor's definition (keeping its declaration-order position) and
    // resets the accumulated configure entry for that name: a fresh provide
    // starts from its own defaults, and re-providing is the one thing that
    // overrides an inherited disable.
    let mut provides: Vec<(&'static str, FeatureDefinition)> = Vec::new();
    let mut configures: Vec<(&'static str, ConfigureEntry)> = Vec::new();

    for &link in &chain {
        let Some(meta) = registry.meta(link) else {
            continue;
        };
        for &(name, ref definition) in meta.provides() {
            match provides.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = definition.clone(),
                None => provides.push((name, definition.clone())),
            }
            configures.retain(|(n, _)| *n != name);
        }
        for &(name, ref entry) in meta.configures() {
            match configures.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1.merge_onto(entry),
                None => configures.push((name, entry.clone())),
            }
        }
    }

    // Assemble the surviving features in declaration order.
    let mut features: Vec<ResolvedFeature> = Vec::new();
    for &(name, ref definition) in &provides {
        let configure = configures
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, entry)| entry);

        if matches!(configure, Some(ConfigureEntry::Disable)) {
            observer.feature_dropped(class, name, DropReason::ConfiguredOff);
            continue;
        }
        if definition.enabled_flag() == Some(false) {
            observer.feature_dropped(class, name, DropReason::Disabled);
            continue;
        }

        features.push(assemble_feature(registry, name, definition, configure));
    }

    // Flatten property sets (last write wins) and concatenate styles.
    let mut properties: Vec<(&'static str, PropertyDecl)> = Vec::new();
    let mut owners: Vec<&'static str> = Vec::new();
    let mut styles = Vec::new();
    for feature in &features {
        for &(property, ref decl) in &feature.properties {
            match properties.iter().position(|(n, _)| *n == property) {
                Some(idx) => {
                    observer.property_collision(property, feature.name, owners[idx]);
                    properties[idx].1 = decl.clone();
                    owners[idx] = feature.name;
                }
                None => {
                    properties.push((property, decl.clone()));
                    owners.push(feature.name);
                }
            }
        }
        styles.extend(feature.styles.iter().cloned());
    }

    observer.plan_resolved(class, features.len());

    ResolvedFeatures {
        features,
        properties,
        styles,
    }
}

/// Builds one surviving feature's merged property set, styles, and config.
fn assemble_feature(
    registry: &ComponentRegistry,
    name: &'static str,
    definition: &FeatureDefinition,
    configure: Option<&ConfigureEntry>,
) -> ResolvedFeature {
    // The feature's own ancestry contributes properties and styles,
    // root-first so a feature subtype overrides its supertype's
    // declarations for same-named keys.
    let feature_chain = registry.chain(definition.class(), TypeMarkers::FEATURE);

    let mut properties: Vec<(&'static str, PropertyDecl)> = Vec::new();
    let mut styles = Vec::new();
    for &link in &feature_chain {
        if let Some(meta) = registry.meta(link) {
            for &(property, ref decl) in meta.properties() {
                match properties.iter_mut().find(|(n, _)| *n == property) {
                    Some(slot) => slot.1 = decl.clone(),
                    None => properties.push((property, decl.clone())),
                }
            }
        }
        styles.extend(registry.styles(link).iter().cloned());
    }

    // Configure-level property overrides: disable removes, declare replaces
    // or inserts.
    if let Some(ConfigureEntry::Override {
        properties: overrides,
        ..
    }) = configure
    {
        for &(property, ref entry) in overrides {
            match entry {
                PropertyOverride::Disable => properties.retain(|(n, _)| *n != property),
                PropertyOverride::Declare(decl) => {
                    match properties.iter_mut().find(|(n, _)| *n == property) {
                        Some(slot) => slot.1 = decl.clone(),
                        None => properties.push((property, decl.clone())),
                    }
                }
            }
        }
    }

    // Final config: definition defaults with the configure overlay deep-merged
    // on top (configure wins on conflicting leaf keys).
    let mut config = definition.config().cloned().unwrap_or_default();
    if let Some(ConfigureEntry::Override {
        config: Some(overlay),
        ..
    }) = configure
    {
        config.merge_from(overlay);
    }

    ResolvedFeature {
        name,
        class: definition.class(),
        config,
        properties,
        styles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{RecordingObserver, ResolveEvent};
    use alloc::vec;
    use trellis_registry::{ConfigMap, ConfigValue, StyleBlock, TypeConfig};

    fn config(entries: impl IntoIterator<Item = (&'static str, i64)>) -> ConfigMap {
        entries
            .into_iter()
            .map(|(k, v)| (k, ConfigValue::Int(v)))
            .collect()
    }

    #[test]
    fn resolve_empty_class() {
        let mut registry = ComponentRegistry::new();
        let class = registry.register("Plain", TypeConfig::host());

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, class);
        assert!(plan.is_empty());
        assert!(plan.properties().is_empty());
        assert!(plan.styles().is_empty());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());
        let class = registry.register(
            "Host",
            TypeConfig::host().provide("f", FeatureDefinition::new(feature)),
        );

        let resolver = FeatureResolver::new();
        let first = resolver.resolve(&registry, class);
        let second = resolver.resolve(&registry, class);
        assert!(Rc::ptr_eq(&first, &second));
        assert!(resolver.is_resolved(class));
        assert_eq!(resolver.resolved_count(), 1);
    }

    #[test]
    fn resolve_caches_per_class() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());
        let base = registry.register(
            "Base",
            TypeConfig::host().provide("f", FeatureDefinition::new(feature)),
        );
        let leaf = registry.register("Leaf", TypeConfig::host().parent(base));

        let resolver = FeatureResolver::new();
        let base_plan = resolver.resolve(&registry, base);
        let leaf_plan = resolver.resolve(&registry, leaf);
        assert!(!Rc::ptr_eq(&base_plan, &leaf_plan));
        assert_eq!(resolver.resolved_count(), 2);
    }

    #[test]
    fn override_ordering_per_level() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());

        let a = registry.register(
            "A",
            TypeConfig::host().provide(
                "f",
                FeatureDefinition::new(feature).with_config(config([("x", 1)])),
            ),
        );
        let b = registry.register(
            "B",
            TypeConfig::host()
                .parent(a)
                .configure("f", ConfigureEntry::new().with_config(config([("x", 2)]))),
        );
        let c = registry.register(
            "C",
            TypeConfig::host()
                .parent(b)
                .configure("f", ConfigureEntry::new().with_config(config([("x", 3)]))),
        );

        let resolver = FeatureResolver::new();
        let get_x = |class| {
            resolver
                .resolve(&registry, class)
                .feature("f")
                .unwrap()
                .config()
                .get("x")
                .cloned()
        };

        assert_eq!(get_x(a), Some(ConfigValue::Int(1)));
        assert_eq!(get_x(b), Some(ConfigValue::Int(2)));
        assert_eq!(get_x(c), Some(ConfigValue::Int(3)));
    }

    #[test]
    fn deep_merge_not_replace() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());

        let nested = |key, value| {
            ConfigMap::from_iter([(
                "nested",
                ConfigValue::Map(ConfigMap::from_iter([(key, ConfigValue::Int(value))])),
            )])
        };

        let base = registry.register(
            "Base",
            TypeConfig::host().provide(
                "f",
                FeatureDefinition::new(feature).with_config(nested("a", 1)),
            ),
        );
        let leaf = registry.register(
            "Leaf",
            TypeConfig::host()
                .parent(base)
                .configure("f", ConfigureEntry::new().with_config(nested("b", 2))),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, leaf);
        let Some(ConfigValue::Map(merged)) = plan.feature("f").unwrap().config().get("nested")
        else {
            panic!("nested map expected");
        };
        assert_eq!(merged.get("a"), Some(&ConfigValue::Int(1)));
        assert_eq!(merged.get("b"), Some(&ConfigValue::Int(2)));
    }

    #[test]
    fn configure_disable_drops_feature() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register(
            "F",
            TypeConfig::feature()
                .property("p", PropertyDecl::new())
                .style(StyleBlock::new(":host {}")),
        );

        let a = registry.register(
            "A",
            TypeConfig::host().provide("f", FeatureDefinition::new(feature)),
        );
        let b = registry.register(
            "B",
            TypeConfig::host()
                .parent(a)
                .configure("f", ConfigureEntry::Disable),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, b);
        assert!(plan.feature("f").is_none());
        // A disabled feature contributes no properties and no styles.
        assert!(plan.properties().is_empty());
        assert!(plan.styles().is_empty());

        // The ancestor itself is unaffected.
        let base_plan = resolver.resolve(&registry, a);
        assert!(base_plan.feature("f").is_some());
    }

    #[test]
    fn reprovide_overrides_ancestor_disable() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());

        let a = registry.register(
            "A",
            TypeConfig::host().provide(
                "f",
                FeatureDefinition::new(feature).with_config(config([("x", 1)])),
            ),
        );
        let b = registry.register(
            "B",
            TypeConfig::host()
                .parent(a)
                .configure("f", ConfigureEntry::Disable),
        );
        let c = registry.register(
            "C",
            TypeConfig::host()
                .parent(b)
                .provide("f", FeatureDefinition::new(feature)),
        );

        let resolver = FeatureResolver::new();
        assert!(resolver.resolve(&registry, b).feature("f").is_none());

        // Re-providing starts fresh: active again, ancestor config gone.
        let plan = resolver.resolve(&registry, c);
        let resolved = plan.feature("f").expect("re-provided feature is active");
        assert!(resolved.config().is_empty());
    }

    #[test]
    fn enabled_false_drops_feature() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());
        let class = registry.register(
            "Host",
            TypeConfig::host().provide("f", FeatureDefinition::new(feature).enabled(false)),
        );

        let resolver = FeatureResolver::new();
        let mut observer = RecordingObserver::new();
        let plan = resolver.resolve_with(&registry, class, &mut observer);
        assert!(plan.is_empty());
        assert!(observer.events().contains(&ResolveEvent::FeatureDropped {
            class,
            feature: "f",
            reason: DropReason::Disabled,
        }));
    }

    #[test]
    fn configure_without_provide_is_inert() {
        let mut registry = ComponentRegistry::new();
        let class = registry.register(
            "Host",
            TypeConfig::host().configure("ghost", ConfigureEntry::new().with_config(config([("x", 1)]))),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, class);
        assert!(plan.is_empty());
    }

    #[test]
    fn feature_chain_properties_and_styles() {
        let mut registry = ComponentRegistry::new();
        let base_feature = registry.register(
            "BaseOverlay",
            TypeConfig::feature()
                .property(
                    "open",
                    PropertyDecl::new().with_default(trellis_registry::PropertyValue::new(false)),
                )
                .property("placement", PropertyDecl::new().with_attribute("placement"))
                .style(StyleBlock::new(":host { position: absolute; }")),
        );
        let sub_feature = registry.register(
            "Popover",
            TypeConfig::feature()
                .parent(base_feature)
                // Subtype overrides the supertype's declaration for `placement`.
                .property("placement", PropertyDecl::new().with_attribute("popover-placement"))
                .style(StyleBlock::new(":host { z-index: 10; }")),
        );

        let class = registry.register(
            "Host",
            TypeConfig::host().provide("popover", FeatureDefinition::new(sub_feature)),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, class);
        let resolved = plan.feature("popover").unwrap();

        assert_eq!(resolved.properties().len(), 2);
        assert_eq!(
            resolved.property("placement").unwrap().attribute(),
            Some("popover-placement"),
        );
        assert!(resolved.property("open").is_some());

        let styles: Vec<_> = plan.styles().iter().map(StyleBlock::as_str).collect();
        assert_eq!(
            styles,
            vec![":host { position: absolute; }", ":host { z-index: 10; }"],
        );
    }

    #[test]
    fn configure_property_disable_removes() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register(
            "F",
            TypeConfig::feature()
                .property("p", PropertyDecl::new())
                .property("q", PropertyDecl::new()),
        );

        let a = registry.register(
            "A",
            TypeConfig::host().provide("f", FeatureDefinition::new(feature)),
        );
        let b = registry.register(
            "B",
            TypeConfig::host().parent(a).configure(
                "f",
                ConfigureEntry::new().with_property("p", PropertyOverride::Disable),
            ),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, b);
        let resolved = plan.feature("f").unwrap();
        assert!(resolved.property("p").is_none());
        assert!(resolved.property("q").is_some());
        assert!(plan.property("p").is_none());
        assert!(plan.property("q").is_some());
    }

    #[test]
    fn configure_property_declare_replaces() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register(
            "F",
            TypeConfig::feature().property("p", PropertyDecl::new()),
        );

        let class = registry.register(
            "Host",
            TypeConfig::host()
                .provide("f", FeatureDefinition::new(feature))
                .configure(
                    "f",
                    ConfigureEntry::new().with_property(
                        "p",
                        PropertyOverride::Declare(PropertyDecl::new().with_attribute("p-attr")),
                    ),
                ),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, class);
        assert_eq!(
            plan.feature("f").unwrap().property("p").unwrap().attribute(),
            Some("p-attr"),
        );
    }

    #[test]
    fn property_collision_last_write_wins() {
        let mut registry = ComponentRegistry::new();
        let f1 = registry.register(
            "F1",
            TypeConfig::feature().property("shared", PropertyDecl::new().with_attribute("one")),
        );
        let f2 = registry.register(
            "F2",
            TypeConfig::feature().property("shared", PropertyDecl::new().with_attribute("two")),
        );

        let class = registry.register(
            "Host",
            TypeConfig::host()
                .provide("first", FeatureDefinition::new(f1))
                .provide("second", FeatureDefinition::new(f2)),
        );

        let resolver = FeatureResolver::new();
        let mut observer = RecordingObserver::new();
        let plan = resolver.resolve_with(&registry, class, &mut observer);

        assert_eq!(plan.property("shared").unwrap().attribute(), Some("two"));
        assert!(observer.events().contains(&ResolveEvent::PropertyCollision {
            property: "shared",
            winner: "second",
            loser: "first",
        }));
        // Per-feature sets stay intact.
        assert_eq!(
            plan.feature("first").unwrap().property("shared").unwrap().attribute(),
            Some("one"),
        );
    }

    #[test]
    fn declaration_order_is_provide_order() {
        let mut registry = ComponentRegistry::new();
        let f = registry.register("F", TypeConfig::feature());

        let base = registry.register(
            "Base",
            TypeConfig::host()
                .provide("alpha", FeatureDefinition::new(f))
                .provide("beta", FeatureDefinition::new(f)),
        );
        let leaf = registry.register(
            "Leaf",
            TypeConfig::host()
                .parent(base)
                .provide("gamma", FeatureDefinition::new(f))
                // Re-provide keeps alpha's original position.
                .provide("alpha", FeatureDefinition::new(f).with_config(config([("x", 1)]))),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, leaf);
        let names: Vec<_> = plan.features().iter().map(ResolvedFeature::name).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
        assert!(plan.feature("alpha").unwrap().config().contains_key("x"));
    }

    #[test]
    fn subclass_provide_replaces_definition() {
        let mut registry = ComponentRegistry::new();
        let f1 = registry.register("F1", TypeConfig::feature());
        let f2 = registry.register("F2", TypeConfig::feature());

        let base = registry.register(
            "Base",
            TypeConfig::host().provide("slot", FeatureDefinition::new(f1)),
        );
        let leaf = registry.register(
            "Leaf",
            TypeConfig::host()
                .parent(base)
                .provide("slot", FeatureDefinition::new(f2)),
        );

        let resolver = FeatureResolver::new();
        let plan = resolver.resolve(&registry, leaf);
        assert_eq!(plan.feature("slot").unwrap().class(), f2);
    }

    #[test]
    fn plan_resolved_event_fires_once() {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register("F", TypeConfig::feature());
        let class = registry.register(
            "Host",
            TypeConfig::host().provide("f", FeatureDefinition::new(feature)),
        );

        let resolver = FeatureResolver::new();
        let mut observer = RecordingObserver::new();
        resolver.resolve_with(&registry, class, &mut observer);
        resolver.resolve_with(&registry, class, &mut observer);

        let resolved_events = observer
            .events()
            .iter()
            .filter(|e| matches!(e, ResolveEvent::PlanResolved { .. }))
            .count();
        assert_eq!(resolved_events, 1, "cache hits are silent");
    }
}
