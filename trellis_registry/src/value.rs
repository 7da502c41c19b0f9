// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased reactive property values.
//!
//! This module provides [`PropertyValue`] for storing property values of any
//! type in a heterogeneous collection. Unlike a plain erased box, it is
//! comparable: the write guards in `trellis_compose` decide between no-op,
//! mirror, and propagate based on value identity, so equality is part of the
//! contract here.

use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::fmt;

/// A type-erased, comparable property value.
///
/// This wraps a value of any `'static + Clone + PartialEq` type behind an
/// [`Rc`], storing it with its type information for later downcasting.
/// Cloning a `PropertyValue` is cheap (a reference-count bump), and equality
/// short-circuits on pointer identity before falling back to value equality.
///
/// # Example
///
/// ```rust
/// use trellis_registry::PropertyValue;
///
/// let value = PropertyValue::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
///
/// let same = value.clone();
/// assert!(value.ptr_eq(&same));
/// assert_eq!(value, PropertyValue::new(42_i32));
/// assert_ne!(value, PropertyValue::new(43_i32));
/// assert_ne!(value, PropertyValue::new(42.0_f64));
/// ```
pub struct PropertyValue {
    inner: Rc<dyn ValueCell>,
    type_id: TypeId,
}

impl PropertyValue {
    /// Creates a new erased value from a concrete value.
    #[must_use]
    pub fn new<T: Clone + PartialEq + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            inner: Rc::new(value),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Clones the contained value out as a concrete `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn to<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Returns `true` if both values share the same allocation.
    ///
    /// This is the fast identity check used before value comparison.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        core::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl Clone for PropertyValue {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            type_id: self.type_id,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.type_id == other.type_id && self.inner.eq_value(other.inner.as_any())
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValue")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

/// Trait object for type-erased values that can be compared.
trait ValueCell: Any {
    fn as_any(&self) -> &dyn Any;
    fn eq_value(&self, other: &dyn Any) -> bool;
}

impl<T: Clone + PartialEq + 'static> ValueCell for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_value(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }
}
