// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature configuration trees.
//!
//! A feature's configuration is a small tree of [`ConfigValue`]s keyed by
//! static names. Configuration layering across an inheritance chain uses
//! [`ConfigMap::merge_from`]: later keys win, and nested maps merge
//! recursively rather than replacing wholesale.
//!
//! # Implementation
//!
//! `ConfigMap` stores its entries in a sorted vector with binary search,
//! matching the sparse property storage used elsewhere in the workspace:
//! good cache locality, low overhead, and O(log n) lookup for the small key
//! counts typical of feature configuration.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A configuration value.
///
/// # Example
///
/// ```rust
/// use trellis_registry::{ConfigMap, ConfigValue};
///
/// let mut map = ConfigMap::new();
/// map.insert("delay", ConfigValue::Int(300));
/// map.insert("placement", ConfigValue::from("top"));
///
/// assert_eq!(map.get("delay"), Some(&ConfigValue::Int(300)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered list.
    List(Vec<ConfigValue>),
    /// A nested map.
    Map(ConfigMap),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(String::from(value))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        Self::Map(value)
    }
}

/// A map of configuration keys to values, sorted by key.
///
/// `ConfigMap` is the payload of a feature's default configuration and of
/// `configure` overrides. Merging follows the deep-merge rule: later keys
/// win, `Map`-onto-`Map` merges recursively, any other pairing replaces.
///
/// # Example
///
/// ```rust
/// use trellis_registry::{ConfigMap, ConfigValue};
///
/// let base: ConfigMap = [(
///     "nested",
///     ConfigValue::from(ConfigMap::from_iter([("a", ConfigValue::Int(1))])),
/// )]
/// .into_iter()
/// .collect();
///
/// let overlay: ConfigMap = [(
///     "nested",
///     ConfigValue::from(ConfigMap::from_iter([("b", ConfigValue::Int(2))])),
/// )]
/// .into_iter()
/// .collect();
///
/// let merged = ConfigMap::merged(&base, &overlay);
/// let Some(ConfigValue::Map(nested)) = merged.get("nested") else {
///     panic!("nested map expected");
/// };
/// assert_eq!(nested.get("a"), Some(&ConfigValue::Int(1)));
/// assert_eq!(nested.get("b"), Some(&ConfigValue::Int(2)));
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct ConfigMap {
    /// Entries sorted by key for binary search lookup.
    entries: Vec<(&'static str, ConfigValue)>,
}

impl ConfigMap {
    /// Creates a new empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the number of keys in this map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if this map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn find(&self, key: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| (*k).cmp(key))
    }

    /// Returns the value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.find(key).ok().map(|idx| &self.entries[idx].1)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_ok()
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(
        &mut self,
        key: &'static str,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        let value = value.into();
        match self.find(key) {
            Ok(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            Err(idx) => {
                self.entries.insert(idx, (key, value));
                None
            }
        }
    }

    /// Returns an iterator over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConfigValue)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Deep-merges `overlay` into this map.
    ///
    /// For each key in `overlay`: if both sides hold a [`ConfigValue::Map`],
    /// the maps merge recursively; otherwise the overlay value replaces the
    /// existing one (or is inserted).
    pub fn merge_from(&mut self, overlay: &Self) {
        for &(key, ref value) in &overlay.entries {
            match self.find(key) {
                Ok(idx) => {
                    if let (ConfigValue::Map(base), ConfigValue::Map(inner)) =
                        (&mut self.entries[idx].1, value)
                    {
                        base.merge_from(inner);
                    } else {
                        self.entries[idx].1 = value.clone();
                    }
                }
                Err(idx) => self.entries.insert(idx, (key, value.clone())),
            }
        }
    }

    /// Returns the deep merge of `base` with `overlay` layered on top.
    #[must_use]
    pub fn merged(base: &Self, overlay: &Self) -> Self {
        let mut out = base.clone();
        out.merge_from(overlay);
        out
    }
}

impl FromIterator<(&'static str, ConfigValue)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (&'static str, ConfigValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
