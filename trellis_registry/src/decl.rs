// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reactive property declarations and style blocks.
//!
//! A feature class declares reactive properties and style blocks; both are
//! carried through resolution opaquely. The declaration format describes
//! attribute binding and reflection semantics for the host to interpret —
//! the resolution engine only stores, merges, and passes them through.

use alloc::rc::Rc;
use core::fmt;

use crate::value::PropertyValue;

bitflags::bitflags! {
    /// Attribute-binding semantics of a property declaration.
    ///
    /// These are pass-through flags: the host's reactive runtime interprets
    /// them, the resolution engine does not.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct DeclFlags: u8 {
        /// The property is bound to an attribute.
        const ATTRIBUTE = 1 << 0;
        /// Property changes reflect back to the attribute.
        const REFLECT = 1 << 1;
    }
}

impl Default for DeclFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A reactive property declaration.
///
/// Declarations are built with the `with_*` methods and stored on feature
/// classes; the resolver merges them across feature chains and configure
/// overrides, and the composition runtime uses the declared default for the
/// initial value wave.
///
/// # Example
///
/// ```rust
/// use trellis_registry::{DeclFlags, PropertyDecl, PropertyValue};
///
/// let decl = PropertyDecl::new()
///     .with_attribute("placement")
///     .with_flags(DeclFlags::ATTRIBUTE | DeclFlags::REFLECT)
///     .with_default(PropertyValue::new("top"));
///
/// assert_eq!(decl.attribute(), Some("placement"));
/// assert!(decl.flags().contains(DeclFlags::REFLECT));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PropertyDecl {
    attribute: Option<&'static str>,
    flags: DeclFlags,
    default: Option<PropertyValue>,
}

impl PropertyDecl {
    /// Creates an empty declaration: no attribute, no flags, no default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attribute name this property binds to.
    #[must_use]
    pub fn with_attribute(mut self, attribute: &'static str) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Sets the declaration flags.
    #[must_use]
    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the default value written during the initial value wave.
    #[must_use]
    pub fn with_default(mut self, default: PropertyValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the attribute name, if bound.
    #[must_use]
    #[inline]
    pub fn attribute(&self) -> Option<&'static str> {
        self.attribute
    }

    /// Returns the declaration flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> DeclFlags {
        self.flags
    }

    /// Returns the declared default value, if any.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> Option<&PropertyValue> {
        self.default.as_ref()
    }
}

/// An opaque block of style source.
///
/// The engine never parses style text; it only concatenates blocks in a
/// deterministic order. Blocks share their backing storage, so cloning one
/// into a resolved plan is cheap.
///
/// # Example
///
/// ```rust
/// use trellis_registry::StyleBlock;
///
/// let block = StyleBlock::new(":host { display: block; }");
/// assert_eq!(block.as_str(), ":host { display: block; }");
/// assert_eq!(block.clone(), block);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct StyleBlock {
    source: Rc<str>,
}

impl StyleBlock {
    /// Creates a style block from source text.
    #[must_use]
    pub fn new(source: impl Into<Rc<str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Returns the style source text.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for StyleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StyleBlock").field(&self.as_str()).finish()
    }
}
