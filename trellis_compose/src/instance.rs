// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance feature state and guarded property synchronization.
//!
//! [`FeatureCore`] is the state every feature instance owns: its
//! configuration, the set of properties its class declared, and an internal
//! value cache mirroring the host's reactive fields. The write path applies
//! three guards so that host-driven and feature-driven writes to the same
//! property converge to one consistent value with at most one update
//! request, in either arrival order:
//!
//! 1. Value identical to the internal cache → already applied, no-op.
//! 2. Value identical to the host's current value → mirror into the cache
//!    only; no host write, no update request.
//! 3. Otherwise → write the host field, mirror the cache, and (unless
//!    suspended) request a host update carrying the previous host value.

use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use trellis_registry::{ConfigMap, PropertyValue};
use trellis_resolve::ResolvedFeature;

use crate::host::FeatureHost;

/// What a guarded property write did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was already cached; nothing happened.
    Unchanged,
    /// The host already held the value; only the cache was updated.
    Mirrored,
    /// The value was written to the host and cached.
    ///
    /// An update request was issued unless the core was suspended.
    Applied,
}

/// Error returned when writing a property the feature never declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownProperty {
    feature: &'static str,
    property: &'static str,
}

impl UnknownProperty {
    /// Returns the feature that rejected the write.
    #[must_use]
    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Returns the undeclared property name.
    #[must_use]
    pub fn property(&self) -> &'static str {
        self.property
    }
}

impl fmt::Display for UnknownProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "feature `{}` does not declare property `{}`",
            self.feature, self.property
        )
    }
}

impl core::error::Error for UnknownProperty {}

/// The state owned by one feature instance on one host.
///
/// Built from a [`ResolvedFeature`] plan entry: the configuration is an
/// instance-local copy, and the declared property set is the feature's own
/// merged set, independent of the plan's flattened union.
///
/// The lifecycle is linear: constructed (usually suspended by the
/// composition manager), defaults written, resumed, reconciled once on the
/// host's first update, then kept in sync on every later update.
#[derive(Debug)]
pub struct FeatureCore {
    name: &'static str,
    config: ConfigMap,
    /// Declared property names and their declared defaults, in declaration order.
    declared: Vec<(&'static str, Option<PropertyValue>)>,
    /// Internal value cache, sorted by property name.
    values: Vec<(&'static str, PropertyValue)>,
    suspended: bool,
    reconciled: bool,
}

impl FeatureCore {
    /// Creates the state for one instance of a resolved feature.
    #[must_use]
    pub fn new(feature: &ResolvedFeature) -> Self {
        Self {
            name: feature.name(),
            config: feature.config().clone(),
            declared: feature
                .properties()
                .iter()
                .map(|(name, decl)| (*name, decl.default_value().cloned()))
                .collect(),
            values: Vec::new(),
            suspended: false,
            reconciled: false,
        }
    }

    /// Returns the feature name this instance was provided under.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns this instance's configuration.
    #[must_use]
    #[inline]
    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Returns `true` if the feature declared this property.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.declared.iter().any(|(n, _)| *n == name)
    }

    /// Returns the declared property names in declaration order.
    pub fn declared_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.declared.iter().map(|(name, _)| *name)
    }

    /// Returns the internally cached value of a property.
    #[must_use]
    pub fn read(&self, name: &str) -> Option<&PropertyValue> {
        self.find(name).ok().map(|idx| &self.values[idx].1)
    }

    /// Suspends update requests.
    ///
    /// While suspended, writes still update the cache and the host field but
    /// never request a host update. The composition manager uses this to
    /// batch the initial default wave from all features into one request.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Resumes update requests.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Returns `true` if update requests are suspended.
    #[must_use]
    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Returns `true` if first reconciliation has run.
    #[must_use]
    #[inline]
    pub fn is_reconciled(&self) -> bool {
        self.reconciled
    }

    /// Writes a property through the guard chain.
    ///
    /// Returns what the write did, or [`UnknownProperty`] if the feature
    /// never declared `name`.
    pub fn write(
        &mut self,
        host: &mut dyn FeatureHost,
        name: &'static str,
        value: PropertyValue,
    ) -> Result<WriteOutcome, UnknownProperty> {
        if !self.declares(name) {
            return Err(UnknownProperty {
                feature: self.name,
                property: name,
            });
        }
        Ok(self.apply(host, name, value))
    }

    /// Writes every declared default through the guard chain.
    ///
    /// Typically called while suspended, so the whole wave produces no
    /// update requests and the manager consolidates it into one.
    pub fn write_defaults(&mut self, host: &mut dyn FeatureHost) {
        let defaults: SmallVec<[(&'static str, PropertyValue); 8]> = self
            .declared
            .iter()
            .filter_map(|(name, default)| default.clone().map(|value| (*name, value)))
            .collect();
        for (name, value) in defaults {
            self.apply(host, name, value);
        }
    }

    /// Reconciles this instance against the host after the first update.
    ///
    /// For every declared property: a defined host value that differs from
    /// the cache wins and is pulled in (externally supplied attribute or
    /// property values take precedence over feature defaults); if the host
    /// has no value but the cache does, the cached value is pushed out and
    /// an update requested; if neither side has a value, nothing happens.
    ///
    /// Runs at most once; later calls are no-ops.
    pub fn reconcile_first(&mut self, host: &mut dyn FeatureHost) {
        if self.reconciled {
            return;
        }
        self.reconciled = true;

        let names: SmallVec<[&'static str; 8]> =
            self.declared.iter().map(|(name, _)| *name).collect();
        for name in names {
            let host_value = host.value(name).cloned();
            match (host_value, self.read(name).cloned()) {
                (Some(host_value), cached) => {
                    if cached.is_none_or(|cached| cached != host_value) {
                        self.cache_set(name, host_value);
                    }
                }
                (None, Some(cached)) => {
                    host.set_value(name, cached);
                    if !self.suspended {
                        host.request_update(name, None);
                    }
                }
                (None, None) => {}
            }
        }
    }

    /// Copies changed host values into the internal cache.
    ///
    /// One-way host→feature sync for updates after the first. Deliberately
    /// bypasses the write guards: the change already originated on the host
    /// side, so no host write and no update request must follow.
    pub fn sync_changed(&mut self, host: &dyn FeatureHost, changed: &[&'static str]) {
        for &name in changed {
            if !self.declares(name) {
                continue;
            }
            if let Some(value) = host.value(name) {
                let value = value.clone();
                self.cache_set(name, value);
            }
        }
    }

    #[inline]
    fn find(&self, name: &str) -> Result<usize, usize> {
        self.values.binary_search_by(|(n, _)| (*n).cmp(name))
    }

    fn cache_set(&mut self, name: &'static str, value: PropertyValue) {
        match self.find(name) {
            Ok(idx) => self.values[idx].1 = value,
            Err(idx) => self.values.insert(idx, (name, value)),
        }
    }

    /// The three-guard write path. Callers have checked `name` is declared.
    fn apply(
        &mut self,
        host: &mut dyn FeatureHost,
        name: &'static str,
        value: PropertyValue,
    ) -> WriteOutcome {
        if self.read(name).is_some_and(|cached| *cached == value) {
            return WriteOutcome::Unchanged;
        }

        let old = host.value(name).cloned();
        if old.as_ref().is_some_and(|host_value| *host_value == value) {
            self.cache_set(name, value);
            return WriteOutcome::Mirrored;
        }

        host.set_value(name, value.clone());
        self.cache_set(name, value);
        if !self.suspended {
            host.request_update(name, old);
        }
        WriteOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use trellis_registry::{
        ComponentRegistry, FeatureDefinition, PropertyDecl, TypeConfig,
    };
    use trellis_resolve::FeatureResolver;

    #[derive(Default)]
    struct TestHost {
        values: BTreeMap<&'static str, PropertyValue>,
        set_calls: usize,
        update_requests: Vec<(&'static str, Option<PropertyValue>)>,
        batch_requests: usize,
    }

    impl FeatureHost for TestHost {
        fn value(&self, name: &str) -> Option<&PropertyValue> {
            self.values.get(name)
        }

        fn set_value(&mut self, name: &'static str, value: PropertyValue) {
            self.set_calls += 1;
            self.values.insert(name, value);
        }

        fn has_field(&self, _name: &str) -> bool {
            false
        }

        fn request_update(&mut self, name: &'static str, old: Option<PropertyValue>) {
            self.update_requests.push((name, old));
        }

        fn request_batch_update(&mut self) {
            self.batch_requests += 1;
        }
    }

    /// Builds a core for a feature declaring `size` (default `"small"`) and
    /// `open` (no default).
    fn setup_core() -> FeatureCore {
        let mut registry = ComponentRegistry::new();
        let feature = registry.register(
            "Sizer",
            TypeConfig::feature()
                .property(
                    "size",
                    PropertyDecl::new().with_default(PropertyValue::new("small")),
                )
                .property("open", PropertyDecl::new()),
        );
        let host = registry.register(
            "Host",
            TypeConfig::host().provide("sizer", FeatureDefinition::new(feature)),
        );
        let plan = FeatureResolver::new().resolve(&registry, host);
        FeatureCore::new(plan.feature("sizer").unwrap())
    }

    #[test]
    fn core_from_plan() {
        let core = setup_core();
        assert_eq!(core.name(), "sizer");
        assert!(core.declares("size"));
        assert!(core.declares("open"));
        assert!(!core.declares("other"));
        assert_eq!(core.declared_names().collect::<Vec<_>>(), vec!["size", "open"]);
        assert!(core.read("size").is_none());
        assert!(!core.is_suspended());
        assert!(!core.is_reconciled());
    }

    #[test]
    fn write_unknown_property_errors() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        let err = core
            .write(&mut host, "missing", PropertyValue::new(1_i32))
            .unwrap_err();
        assert_eq!(err.feature(), "sizer");
        assert_eq!(err.property(), "missing");
        assert!(host.values.is_empty());
    }

    #[test]
    fn write_applies_once() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        // New value: one host write, one update request.
        let outcome = core
            .write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(host.set_calls, 1);
        assert_eq!(host.update_requests.len(), 1);
        assert_eq!(host.update_requests[0].0, "size");
        assert!(host.update_requests[0].1.is_none(), "no previous host value");
        assert_eq!(
            core.read("size").and_then(|v| v.downcast_ref::<&str>()),
            Some(&"large")
        );
    }

    #[test]
    fn write_same_value_is_noop() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        core.write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();

        // Identical value again: zero writes, zero requests.
        let outcome = core
            .write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert_eq!(host.set_calls, 1);
        assert_eq!(host.update_requests.len(), 1);
    }

    #[test]
    fn write_mirrors_when_host_agrees() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        // Host already carries the value (e.g. a host-driven write arrived
        // first): only the cache updates.
        host.values
            .insert("size", PropertyValue::new("large"));

        let outcome = core
            .write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Mirrored);
        assert_eq!(host.set_calls, 0);
        assert!(host.update_requests.is_empty());
        assert_eq!(
            core.read("size").and_then(|v| v.downcast_ref::<&str>()),
            Some(&"large")
        );
    }

    #[test]
    fn write_passes_previous_host_value() {
        let mut core = setup_core();
        let mut host = TestHost::default();
        host.values.insert("size", PropertyValue::new("small"));

        core.write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();
        assert_eq!(
            host.update_requests[0]
                .1
                .as_ref()
                .and_then(|v| v.downcast_ref::<&str>()),
            Some(&"small")
        );
    }

    #[test]
    fn suspended_writes_update_state_silently() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        core.suspend();
        assert!(core.is_suspended());

        let outcome = core
            .write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Applied);
        // Host state and cache updated, but no update request.
        assert_eq!(host.set_calls, 1);
        assert!(host.update_requests.is_empty());

        core.resume();
        assert!(!core.is_suspended());
    }

    #[test]
    fn write_defaults_writes_declared_defaults_only() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        core.suspend();
        core.write_defaults(&mut host);

        // `size` has a default, `open` does not.
        assert_eq!(
            host.values.get("size").and_then(|v| v.downcast_ref::<&str>()),
            Some(&"small")
        );
        assert!(!host.values.contains_key("open"));
        assert!(host.update_requests.is_empty());
    }

    #[test]
    fn reconcile_host_value_wins() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        // Construction-time default, then an attribute-supplied host value
        // arrives before the first update.
        core.suspend();
        core.write_defaults(&mut host);
        core.resume();
        host.values.insert("size", PropertyValue::new("large"));

        core.reconcile_first(&mut host);
        assert!(core.is_reconciled());
        assert_eq!(
            core.read("size").and_then(|v| v.downcast_ref::<&str>()),
            Some(&"large")
        );
        // Host-wins pulls issue no update request.
        assert!(host.update_requests.is_empty());
    }

    #[test]
    fn reconcile_feature_default_wins() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        // Cache holds a value the host has lost.
        core.write(&mut host, "size", PropertyValue::new("small"))
            .unwrap();
        host.values.remove("size");
        host.update_requests.clear();

        core.reconcile_first(&mut host);
        assert_eq!(
            host.values.get("size").and_then(|v| v.downcast_ref::<&str>()),
            Some(&"small")
        );
        assert_eq!(host.update_requests.len(), 1);
    }

    #[test]
    fn reconcile_neither_side_writes_nothing() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        core.reconcile_first(&mut host);
        // `open` has no host value and no cached value.
        assert!(!host.values.contains_key("open"));
        assert!(core.read("open").is_none());
    }

    #[test]
    fn reconcile_runs_once() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        core.reconcile_first(&mut host);
        host.values.insert("size", PropertyValue::new("large"));
        core.reconcile_first(&mut host);

        // Second call is a no-op: the late host value is not pulled in here
        // (that is the update sync path's job).
        assert!(core.read("size").is_none());
    }

    #[test]
    fn sync_changed_copies_host_values() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        host.values.insert("size", PropertyValue::new("x-large"));
        host.values.insert("unrelated", PropertyValue::new(1_i32));

        core.sync_changed(&host, &["size", "unrelated"]);
        assert_eq!(
            core.read("size").and_then(|v| v.downcast_ref::<&str>()),
            Some(&"x-large")
        );
        // Undeclared names are ignored.
        assert!(core.read("unrelated").is_none());
        // One-way sync: no writes, no requests.
        assert_eq!(host.set_calls, 0);
        assert!(host.update_requests.is_empty());
    }

    #[test]
    fn sync_then_write_converges_without_pingpong() {
        let mut core = setup_core();
        let mut host = TestHost::default();

        // Host-driven change, synced in.
        host.values.insert("size", PropertyValue::new("large"));
        core.sync_changed(&host, &["size"]);

        // A feature write of the same value is now a no-op: the round trip
        // ends here instead of ping-ponging.
        let outcome = core
            .write(&mut host, "size", PropertyValue::new("large"))
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert_eq!(host.set_calls, 0);
        assert!(host.update_requests.is_empty());
    }

    #[test]
    fn unknown_property_display() {
        let mut core = setup_core();
        let mut host = TestHost::default();
        let err = core
            .write(&mut host, "ghost", PropertyValue::new(0_i32))
            .unwrap_err();
        let text = alloc::format!("{err}");
        assert!(text.contains("sizer"));
        assert!(text.contains("ghost"));
    }
}
