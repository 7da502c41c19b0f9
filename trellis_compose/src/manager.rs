// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-host feature composition.
//!
//! A [`CompositionManager`] is constructed once per host instance. It
//! resolves the host class's feature plan (hitting the class-level cache),
//! instantiates every active feature in declaration order, batches the
//! initial default-value wave into a single host update request, and fans
//! out every later lifecycle event to the instances in the same order.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;

use trellis_registry::{ComponentRegistry, ComponentTypeId};
use trellis_resolve::{FeatureResolver, ResolvedFeatures};

use crate::feature::{Feature, FeatureCatalog, HookError};
use crate::host::FeatureHost;
use crate::instance::FeatureCore;
use crate::lifecycle::Lifecycle;

/// Prefix applied to a feature's attachment name when the host already owns
/// a field with the bare name.
const COLLISION_PREFIX: &str = "feature:";

/// A callback sink for composition diagnostics.
///
/// All methods are required; [`NullComposeObserver`] is the no-op
/// implementation.
pub trait ComposeObserver {
    /// Called for every feature instance attached to a host.
    fn feature_attached(&mut self, feature: &'static str, attached_as: &str);

    /// Called when a feature's attachment name collided with an existing
    /// host field and was prefixed. Non-fatal.
    fn feature_renamed(&mut self, feature: &'static str, attached_as: &str);

    /// Called when a feature in the plan has no registered constructor and
    /// was skipped.
    fn feature_skipped(&mut self, feature: &'static str, class: ComponentTypeId);
}

/// A [`ComposeObserver`] that ignores every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullComposeObserver;

impl ComposeObserver for NullComposeObserver {
    fn feature_attached(&mut self, _feature: &'static str, _attached_as: &str) {}

    fn feature_renamed(&mut self, _feature: &'static str, _attached_as: &str) {}

    fn feature_skipped(&mut self, _feature: &'static str, _class: ComponentTypeId) {}
}

struct AttachedFeature {
    name: &'static str,
    attached_as: Cow<'static, str>,
    feature: Box<dyn Feature>,
}

/// Owns and drives the feature instances of one host.
///
/// Construction instantiates the host class's resolved plan against the
/// live host; [`dispatch`](Self::dispatch) fans host lifecycle events out to
/// every instance in declaration order. A hook error aborts the remaining
/// hooks in that pass and propagates to the caller — there is no per-feature
/// isolation.
pub struct CompositionManager {
    plan: Rc<ResolvedFeatures>,
    entries: Vec<AttachedFeature>,
    first_update_done: bool,
}

impl CompositionManager {
    /// Composes the feature plan of `class` onto `host`.
    ///
    /// See [`new_with`](Self::new_with) for the observed variant.
    #[must_use]
    pub fn new(
        host: &mut dyn FeatureHost,
        class: ComponentTypeId,
        registry: &ComponentRegistry,
        resolver: &FeatureResolver,
        catalog: &FeatureCatalog,
    ) -> Self {
        Self::new_with(host, class, registry, resolver, catalog, &mut NullComposeObserver)
    }

    /// Composes the feature plan of `class` onto `host`, reporting
    /// diagnostics to `observer`.
    ///
    /// Every instance is constructed suspended and writes its declared
    /// defaults silently; once all instances are attached, update requests
    /// resume and exactly one consolidated update request is issued on the
    /// host for the whole initial wave.
    pub fn new_with(
        host: &mut dyn FeatureHost,
        class: ComponentTypeId,
        registry: &ComponentRegistry,
        resolver: &FeatureResolver,
        catalog: &FeatureCatalog,
        observer: &mut dyn ComposeObserver,
    ) -> Self {
        let plan = resolver.resolve(registry, class);

        let mut entries: Vec<AttachedFeature> = Vec::with_capacity(plan.len());
        for resolved in plan.features() {
            let Some(ctor) = catalog.ctor_for(registry, resolved.class()) else {
                observer.feature_skipped(resolved.name(), resolved.class());
                continue;
            };

            let mut core = FeatureCore::new(resolved);
            core.suspend();
            let mut feature = ctor(core);
            feature.core_mut().write_defaults(host);

            let attached_as: Cow<'static, str> = if host.has_field(resolved.name()) {
                let renamed = format!("{COLLISION_PREFIX}{}", resolved.name());
                observer.feature_renamed(resolved.name(), &renamed);
                Cow::Owned(renamed)
            } else {
                Cow::Borrowed(resolved.name())
            };
            observer.feature_attached(resolved.name(), &attached_as);

            entries.push(AttachedFeature {
                name: resolved.name(),
                attached_as,
                feature,
            });
        }

        for entry in &mut entries {
            entry.feature.core_mut().resume();
        }
        host.request_batch_update();

        Self {
            plan,
            entries,
            first_update_done: false,
        }
    }

    /// Returns the resolved plan this manager was built from.
    #[must_use]
    #[inline]
    pub fn plan(&self) -> &ResolvedFeatures {
        &self.plan
    }

    /// Returns the number of attached feature instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no feature instances are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` once the first update pass has been dispatched.
    #[must_use]
    pub fn first_update_done(&self) -> bool {
        self.first_update_done
    }

    /// Returns the attachment names in declaration order.
    pub fn attached_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.attached_as.as_ref())
    }

    /// Returns the feature instance attached under `name`.
    ///
    /// A renamed feature is found under its prefixed attachment name.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&dyn Feature> {
        self.entries
            .iter()
            .find(|entry| entry.attached_as == name)
            .map(|entry| &*entry.feature)
    }

    /// Returns the feature instance attached under `name`, mutably.
    #[must_use]
    pub fn feature_mut(&mut self, name: &str) -> Option<&mut (dyn Feature + 'static)> {
        self.entries
            .iter_mut()
            .find(|entry| entry.attached_as == name)
            .map(|entry| &mut *entry.feature)
    }

    /// Fans a host lifecycle event out to every feature instance in
    /// declaration order.
    ///
    /// On the first `Updated` event each instance is reconciled against the
    /// host before its `first_updated` hook runs; on later `Updated` events
    /// each instance syncs the changed host values into its cache before its
    /// `updated` hook runs.
    ///
    /// # Errors
    ///
    /// The first hook error aborts the remaining hooks in this pass and is
    /// returned to the caller.
    pub fn dispatch(
        &mut self,
        host: &mut dyn FeatureHost,
        event: &Lifecycle<'_>,
    ) -> Result<(), HookError> {
        match *event {
            Lifecycle::Connected => {
                for entry in &mut self.entries {
                    entry.feature.host_connected(host)?;
                }
            }
            Lifecycle::Disconnected => {
                for entry in &mut self.entries {
                    entry.feature.host_disconnected(host)?;
                }
            }
            Lifecycle::BeforeUpdate { changed } => {
                for entry in &mut self.entries {
                    entry.feature.before_update(host, changed)?;
                }
            }
            Lifecycle::Updated { changed } => {
                if self.first_update_done {
                    for entry in &mut self.entries {
                        entry.feature.core_mut().sync_changed(&*host, changed);
                        entry.feature.updated(host, changed)?;
                    }
                } else {
                    self.first_update_done = true;
                    for entry in &mut self.entries {
                        entry.feature.core_mut().reconcile_first(host);
                        entry.feature.first_updated(host, changed)?;
                    }
                }
            }
            Lifecycle::AttributeChanged { name, old, new } => {
                for entry in &mut self.entries {
                    entry.feature.attribute_changed(host, name, old, new)?;
                }
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for CompositionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompositionManager")
            .field("features", &self.entries.iter().map(|e| e.name).collect::<Vec<_>>())
            .field("first_update_done", &self.first_update_done)
            .finish_non_exhaustive()
    }
}
