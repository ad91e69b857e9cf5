//! Module provide ordered-set implemented by [OSet] type.
//!
//! OSet projects bare keys onto the balanced-tree engine: the stored
//! value is the key itself and membership is unique.
//!
//! ```
//! use otree::OSet;
//!
//! let mut index: OSet<u64> = OSet::new();
//!
//! assert_eq!(index.insert(10), true);
//! assert_eq!(index.insert(20), true);
//! assert_eq!(index.insert(10), false);
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.contains(&10), true);
//!
//! let keys: Vec<u64> = index.iter().copied().collect();
//! assert_eq!(keys, vec![10, 20]);
//!
//! assert_eq!(index.remove(&10), true);
//! assert_eq!(index.remove(&10), false);
//! ```

use std::{borrow::Borrow, fmt, iter::FromIterator, ops::RangeBounds};

use crate::{
    rb::Rb,
    tree::{Balance, Comparator, Iter, Natural, SelfKey, Tree},
    Result,
};

/// OSet manage a single instance of an in-memory ordered-set, backed
/// by the balanced-tree engine.
pub struct OSet<K, C = Natural, B = Rb> {
    tree: Tree<K, SelfKey, C, B>,
}

impl<K, B> OSet<K, Natural, B> {
    /// Create an empty instance of OSet ordered by the key's natural
    /// order.
    pub fn new() -> OSet<K, Natural, B> {
        OSet { tree: Tree::new() }
    }
}

impl<K, C, B> OSet<K, C, B> {
    /// Create an empty instance of OSet ordered by `comp`.
    pub fn with_comparator(comp: C) -> OSet<K, C, B> {
        OSet {
            tree: Tree::with_comparator(comp),
        }
    }
}

impl<K, C, B> Default for OSet<K, C, B>
where
    C: Default,
{
    fn default() -> OSet<K, C, B> {
        OSet {
            tree: Tree::default(),
        }
    }
}

/// Maintenance API.
impl<K, C, B> OSet<K, C, B> {
    /// Return number of keys in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all keys.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Return an iterator over all keys in this instance.
    pub fn iter(&self) -> Iter<'_, K, SelfKey, C, B> {
        self.tree.iter()
    }
}

impl<K, C, B> OSet<K, C, B>
where
    C: Comparator<K>,
    B: Balance,
{
    /// Add key to the set. Return false, leaving the set unchanged,
    /// when an equal key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.tree.insert_unique(key).1
    }

    /// Remove key from the set; false when it was not present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let pos = self.tree.find(key);
        if pos.is_end() {
            false
        } else {
            self.tree.remove_at(pos);
            true
        }
    }

    /// Check whether key is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        !self.tree.find(key).is_end()
    }

    /// Borrow the stored key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.find(key))
    }

    /// The least key.
    pub fn first(&self) -> Option<&K> {
        self.tree.get(self.tree.begin())
    }

    /// The greatest key.
    pub fn last(&self) -> Option<&K> {
        self.tree.get(self.tree.prev(self.tree.end()))
    }

    /// Range over all keys from low to high, in comparator order. The
    /// iterator is double-ended.
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K, SelfKey, C, B>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        Q: ?Sized,
    {
        self.tree.range(range)
    }

    /// Validate the underlying tree. Refer to
    /// [Tree::validate][crate::Tree::validate].
    pub fn validate(&self) -> Result<()>
    where
        K: fmt::Debug,
    {
        self.tree.validate()
    }
}

impl<K, C, B> Extend<K> for OSet<K, C, B>
where
    C: Comparator<K>,
    B: Balance,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, B> FromIterator<K> for OSet<K, Natural, B>
where
    K: Ord,
    B: Balance,
{
    fn from_iter<I>(iter: I) -> OSet<K, Natural, B>
    where
        I: IntoIterator<Item = K>,
    {
        let mut index = OSet::new();
        index.extend(iter);
        index
    }
}

#[cfg(test)]
#[path = "oset_test.rs"]
mod oset_test;
