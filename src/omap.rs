//! Module provide ordered-map implemented by [OMap] type.
//!
//! OMap projects {Key, Value} pairs onto the balanced-tree engine.
//!
//! - Each entry in OMap instance correspond to a {Key, Value} pair.
//! - Parametrised over `key-type`, `value-type`, comparator and
//!   balancing discipline.
//! - CRUD operations, via set(), get(), remove() api.
//! - Full table scan, to iterate over all entries.
//! - Range scan, to iterate between a ``low`` and ``high``.
//! - Reverse iteration, via [DoubleEndedIterator].
//! - Uses ownership model and borrow semantics to ensure safety.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Constructing a new [OMap] instance and CRUD operations:
//!
//! ```
//! use otree::OMap;
//!
//! let mut index: OMap<String,String> = OMap::new();
//!
//! index.set("key1".to_string(), "value1".to_string());
//! index.set("key2".to_string(), "value2".to_string());
//! index.set("key2".to_string(), "value3".to_string());
//!
//! let n = index.len();
//! assert_eq!(n, 2);
//!
//! let value = index.get("key1").unwrap();
//! assert_eq!(value, &"value1".to_string());
//! let value = index.get("key2").unwrap();
//! assert_eq!(value, &"value3".to_string());
//!
//! let old_value = index.remove("key1").unwrap();
//! assert_eq!(old_value, "value1".to_string());
//! ```
//!
//! Range scan:
//!
//! ```
//! use std::ops::Bound;
//! use otree::OMap;
//!
//! let mut index: OMap<String,String> = OMap::new();
//!
//! index.set("key1".to_string(), "value1".to_string());
//! index.set("key2".to_string(), "value2".to_string());
//! index.set("key3".to_string(), "value3".to_string());
//!
//! let low = Bound::Excluded("key1");
//! let high = Bound::Excluded("key2");
//! let item = index.range::<str, _>((low, high)).next();
//! assert_eq!(item, None);
//!
//! let low = Bound::Excluded("key1");
//! let high = Bound::Excluded("key3");
//! let item = index.range::<str, _>((low, high)).next();
//! assert_eq!(item, Some((&"key2".to_string(), &"value2".to_string())));
//! ```
//!
//! Reverse scan:
//!
//! ```
//! use otree::OMap;
//!
//! let mut index: OMap<String,String> = OMap::new();
//!
//! index.set("key1".to_string(), "value1".to_string());
//! index.set("key2".to_string(), "value2".to_string());
//!
//! let item = index.iter().rev().next();
//! assert_eq!(item, Some((&"key2".to_string(), &"value2".to_string())));
//! ```

use std::{borrow::Borrow, fmt, iter::FromIterator, mem, ops::RangeBounds};

use crate::{
    rb::Rb,
    tree::{self, Balance, Comparator, Natural, PairKey, Tree},
    Result,
};

/// OMap manage a single instance of an in-memory ordered-map, backed
/// by the balanced-tree engine. Key lookups, inserts and removals are
/// logarithmic; iteration is in comparator order.
pub struct OMap<K, W, C = Natural, B = Rb> {
    tree: Tree<(K, W), PairKey, C, B>,
}

impl<K, W, B> OMap<K, W, Natural, B> {
    /// Create an empty instance of OMap ordered by the key's natural
    /// order.
    pub fn new() -> OMap<K, W, Natural, B> {
        OMap { tree: Tree::new() }
    }
}

impl<K, W, C, B> OMap<K, W, C, B> {
    /// Create an empty instance of OMap ordered by `comp`.
    pub fn with_comparator(comp: C) -> OMap<K, W, C, B> {
        OMap {
            tree: Tree::with_comparator(comp),
        }
    }
}

impl<K, W, C, B> Default for OMap<K, W, C, B>
where
    C: Default,
{
    fn default() -> OMap<K, W, C, B> {
        OMap {
            tree: Tree::default(),
        }
    }
}

/// Maintenance API.
impl<K, W, C, B> OMap<K, W, C, B> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Return an iterator over all entries in this instance.
    pub fn iter(&self) -> Iter<'_, K, W, C, B> {
        Iter {
            iter: self.tree.iter(),
        }
    }
}

impl<K, W, C, B> OMap<K, W, C, B>
where
    C: Comparator<K>,
    B: Balance,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn set(&mut self, key: K, value: W) -> Option<W> {
        let pos = self.tree.find(&key);
        if pos.is_end() {
            self.tree.insert_unique((key, value));
            None
        } else {
            let pair = self.tree.value_mut(pos);
            Some(mem::replace(&mut pair.1, value))
        }
    }

    /// Remove key from this instance and return its value. If key is
    /// not present, then remove is effectively a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<W>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let pos = self.tree.find(key);
        if pos.is_end() {
            None
        } else {
            Some(self.tree.remove_at(pos).1)
        }
    }

    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&W>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.find(key)).map(|pair| &pair.1)
    }

    /// Get a mutable borrow of the value for key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut W>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let pos = self.tree.find(key);
        if pos.is_end() {
            None
        } else {
            Some(&mut self.tree.value_mut(pos).1)
        }
    }

    /// Check whether key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        !self.tree.find(key).is_end()
    }

    /// Entry with the least key.
    pub fn first_key_value(&self) -> Option<(&K, &W)> {
        self.tree.get(self.tree.begin()).map(|pair| (&pair.0, &pair.1))
    }

    /// Entry with the greatest key.
    pub fn last_key_value(&self) -> Option<(&K, &W)> {
        let pos = self.tree.prev(self.tree.end());
        self.tree.get(pos).map(|pair| (&pair.0, &pair.1))
    }

    /// Range over all entries from low to high, in comparator order.
    /// The iterator is double-ended.
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K, W, C, B>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        Q: ?Sized,
    {
        Iter {
            iter: self.tree.range(range),
        }
    }

    /// Validate the underlying tree: balance invariant, sort order,
    /// link consistency and cached extrema. Refer to
    /// [Tree::validate][crate::Tree::validate].
    pub fn validate(&self) -> Result<()>
    where
        K: fmt::Debug,
    {
        self.tree.validate()
    }
}

impl<K, W, C, B> Extend<(K, W)> for OMap<K, W, C, B>
where
    C: Comparator<K>,
    B: Balance,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, W)>,
    {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, W, B> FromIterator<(K, W)> for OMap<K, W, Natural, B>
where
    K: Ord,
    B: Balance,
{
    fn from_iter<I>(iter: I) -> OMap<K, W, Natural, B>
    where
        I: IntoIterator<Item = (K, W)>,
    {
        let mut index = OMap::new();
        index.extend(iter);
        index
    }
}

/// Double-ended iterator over `(&key, &value)` entries of an [OMap].
pub struct Iter<'a, K, W, C, B> {
    iter: tree::Iter<'a, (K, W), PairKey, C, B>,
}

impl<'a, K, W, C, B> Iterator for Iter<'a, K, W, C, B> {
    type Item = (&'a K, &'a W);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|pair| (&pair.0, &pair.1))
    }
}

impl<'a, K, W, C, B> DoubleEndedIterator for Iter<'a, K, W, C, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|pair| (&pair.0, &pair.1))
    }
}

#[cfg(test)]
#[path = "omap_test.rs"]
mod omap_test;
