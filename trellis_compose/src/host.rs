// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host boundary.
//!
//! The reactive component that owns a set of feature instances is external
//! to this crate; [`FeatureHost`] is its interface boundary. Feature state
//! never holds a reference back to the host — the host is threaded into
//! every operation that needs it as `&mut dyn FeatureHost`.

use trellis_registry::PropertyValue;

/// The contract a composable host exposes to its features.
///
/// Implemented by the embedding component runtime. The composition layer
/// reads and writes named reactive fields and signals redraws through the
/// request methods; it never interprets how the host schedules or renders.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use trellis_compose::FeatureHost;
/// use trellis_registry::PropertyValue;
///
/// #[derive(Default)]
/// struct Host {
///     values: BTreeMap<&'static str, PropertyValue>,
///     pending_updates: usize,
/// }
///
/// impl FeatureHost for Host {
///     fn value(&self, name: &str) -> Option<&PropertyValue> {
///         self.values.get(name)
///     }
///
///     fn set_value(&mut self, name: &'static str, value: PropertyValue) {
///         self.values.insert(name, value);
///     }
///
///     fn has_field(&self, _name: &str) -> bool {
///         false
///     }
///
///     fn request_update(&mut self, _name: &'static str, _old: Option<PropertyValue>) {
///         self.pending_updates += 1;
///     }
///
///     fn request_batch_update(&mut self) {
///         self.pending_updates += 1;
///     }
/// }
/// ```
pub trait FeatureHost {
    /// Returns the current value of a reactive field, if defined.
    fn value(&self, name: &str) -> Option<&PropertyValue>;

    /// Sets the value of a reactive field.
    ///
    /// This is a plain state write; it must not itself request an update.
    fn set_value(&mut self, name: &'static str, value: PropertyValue);

    /// Returns `true` if the host already owns a field with this name,
    /// independent of the reactive value store.
    ///
    /// Used by the composition manager to detect attachment-name collisions.
    fn has_field(&self, name: &str) -> bool;

    /// Requests a reactive update for one field.
    ///
    /// `old` is the field's previous value, for the host's change detection.
    /// Fire-and-forget: the host batches and schedules on its own terms.
    fn request_update(&mut self, name: &'static str, old: Option<PropertyValue>);

    /// Requests one consolidated update covering any number of field writes.
    fn request_batch_update(&mut self);
}
