// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution diagnostics.
//!
//! The resolver itself never logs; diagnostics are pushed into an injected
//! [`ResolveObserver`] sink. Embedders route them to their own logging, or
//! use [`RecordingObserver`] in tests to assert on what resolution did.

use alloc::vec::Vec;

use trellis_registry::ComponentTypeId;

/// Why a provided feature was dropped from a plan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The definition carries `enabled: false`.
    Disabled,
    /// A configure entry in the chain disabled the feature.
    ConfiguredOff,
}

/// A callback sink for resolution diagnostics.
///
/// All methods are required; [`NullObserver`] is the no-op implementation.
pub trait ResolveObserver {
    /// Called once when a class's plan is built (not on cache hits).
    fn plan_resolved(&mut self, class: ComponentTypeId, feature_count: usize);

    /// Called when a provided feature is dropped from the plan.
    fn feature_dropped(&mut self, class: ComponentTypeId, feature: &'static str, reason: DropReason);

    /// Called when two features declare the same property name.
    ///
    /// The `winner` feature's declaration replaces the `loser`'s in the
    /// flattened union; the per-feature sets are unaffected.
    fn property_collision(&mut self, property: &'static str, winner: &'static str, loser: &'static str);
}

/// A [`ResolveObserver`] that ignores every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullObserver;

impl ResolveObserver for NullObserver {
    fn plan_resolved(&mut self, _class: ComponentTypeId, _feature_count: usize) {}

    fn feature_dropped(
        &mut self,
        _class: ComponentTypeId,
        _feature: &'static str,
        _reason: DropReason,
    ) {
    }

    fn property_collision(
        &mut self,
        _property: &'static str,
        _winner: &'static str,
        _loser: &'static str,
    ) {
    }
}

/// A recorded resolution event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveEvent {
    /// A plan was built for `class` with `feature_count` active features.
    PlanResolved {
        /// The resolved host class.
        class: ComponentTypeId,
        /// Number of active features in the plan.
        feature_count: usize,
    },
    /// A provided feature was dropped.
    FeatureDropped {
        /// The resolved host class.
        class: ComponentTypeId,
        /// The dropped feature's name.
        feature: &'static str,
        /// Why it was dropped.
        reason: DropReason,
    },
    /// Two features declared the same property name.
    PropertyCollision {
        /// The colliding property name.
        property: &'static str,
        /// The feature whose declaration won.
        winner: &'static str,
        /// The feature whose declaration was dropped.
        loser: &'static str,
    },
}

/// A [`ResolveObserver`] that records every event, for tests and tooling.
///
/// # Example
///
/// ```rust
/// use trellis_registry::ComponentTypeId;
/// use trellis_resolve::{RecordingObserver, ResolveEvent, ResolveObserver};
///
/// let mut observer = RecordingObserver::new();
/// observer.plan_resolved(ComponentTypeId::new(0), 2);
/// assert_eq!(
///     observer.events(),
///     &[ResolveEvent::PlanResolved {
///         class: ComponentTypeId::new(0),
///         feature_count: 2,
///     }]
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Vec<ResolveEvent>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[ResolveEvent] {
        &self.events
    }

    /// Clears all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ResolveObserver for RecordingObserver {
    fn plan_resolved(&mut self, class: ComponentTypeId, feature_count: usize) {
        self.events.push(ResolveEvent::PlanResolved {
            class,
            feature_count,
        });
    }

    fn feature_dropped(
        &mut self,
        class: ComponentTypeId,
        feature: &'static str,
        reason: DropReason,
    ) {
        self.events.push(ResolveEvent::FeatureDropped {
            class,
            feature,
            reason,
        });
    }

    fn property_collision(
        &mut self,
        property: &'static str,
        winner: &'static str,
        loser: &'static str,
    ) {
        self.events.push(ResolveEvent::PropertyCollision {
            property,
            winner,
            loser,
        });
    }
}
