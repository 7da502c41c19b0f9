// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host lifecycle events.
//!
//! The host invokes the composition manager at each of its own lifecycle
//! transitions with a [`Lifecycle`] value; the manager fans the event out to
//! every feature instance in declaration order. The variants carry the
//! host's arguments through unchanged.

/// A host lifecycle transition.
///
/// `Updated` covers both the first and every subsequent update pass; the
/// composition manager tracks which one it is and routes first-update
/// reconciliation accordingly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle<'a> {
    /// The host connected.
    Connected,
    /// The host disconnected.
    Disconnected,
    /// The host is about to run an update pass.
    BeforeUpdate {
        /// Names of the properties changed in this pass.
        changed: &'a [&'static str],
    },
    /// The host completed an update pass.
    Updated {
        /// Names of the properties changed in this pass.
        changed: &'a [&'static str],
    },
    /// A host attribute changed.
    AttributeChanged {
        /// The attribute name.
        name: &'a str,
        /// The previous attribute value, if any.
        old: Option<&'a str>,
        /// The new attribute value, if any.
        new: Option<&'a str>,
    },
}
