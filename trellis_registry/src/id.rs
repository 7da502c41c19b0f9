// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component type identification.
//!
//! This module provides [`ComponentTypeId`] for runtime identification of
//! registered component types, and [`TypeMarkers`] for the hierarchy markers
//! that bound chain walking.

use core::fmt;

/// A runtime component type identifier.
///
/// This is a lightweight handle (u16) that uniquely identifies a type
/// within a [`ComponentRegistry`](crate::ComponentRegistry). The u16 size
/// allows up to 65,536 registered types while keeping storage compact.
///
/// # Example
///
/// ```rust
/// use trellis_registry::ComponentTypeId;
///
/// let id = ComponentTypeId::new(42);
/// assert_eq!(id.index(), 42);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentTypeId(u16);

impl ComponentTypeId {
    /// Creates a new type ID from the given index.
    ///
    /// This is typically called by
    /// [`ComponentRegistry::register`](crate::ComponentRegistry::register)
    /// rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this type ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentTypeId").field(&self.0).finish()
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

bitflags::bitflags! {
    /// Hierarchy markers carried by a registered type.
    ///
    /// Chain walking is bounded by a marker: the walker ascends the parent
    /// chain only while ancestors carry the requested marker. Host classes
    /// carry [`TypeMarkers::COMPOSABLE_HOST`]; feature classes carry
    /// [`TypeMarkers::FEATURE`]. A type may carry both.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trellis_registry::TypeMarkers;
    ///
    /// let markers = TypeMarkers::COMPOSABLE_HOST;
    /// assert!(markers.contains(TypeMarkers::COMPOSABLE_HOST));
    /// assert!(!markers.contains(TypeMarkers::FEATURE));
    /// ```
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct TypeMarkers: u8 {
        /// The type participates in host-chain resolution.
        const COMPOSABLE_HOST = 1 << 0;
        /// The type participates in feature-chain resolution.
        const FEATURE = 1 << 1;
    }
}

impl Default for TypeMarkers {
    fn default() -> Self {
        Self::empty()
    }
}
