//! Module implement the balanced binary-search-tree engine, [Tree] type.
//!
//! The engine keeps its nodes in an index-addressed arena. Links are
//! arena indices, [NIL] is the null link, and the end-of-iteration
//! position is the NIL cursor. A node's index never changes while it is
//! alive, insertion never relocates nodes, and two-child deletion
//! relinks the successor's index instead of copying its payload, so a
//! [Cursor] stays valid until the very node it references is removed.
//!
//! The balancing discipline is a type parameter implementing [Balance];
//! [crate::Avl] and [crate::Rb] are the two conforming disciplines. The
//! engine owns the descent, attach and splice logic, the discipline
//! owns the fixup walks that restore its invariant afterward.

use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt, marker,
    ops::{Bound, RangeBounds},
};

use crate::{
    node::{Arena, NIL},
    rb::Rb,
    Error, Result,
};

/// Project an ordering key out of a stored value.
///
/// Containers decide what the key is: a set stores bare keys
/// ([SelfKey]), a map stores `(key, value)` pairs ([PairKey]).
pub trait KeyOf<V> {
    type Key: ?Sized;

    fn key(value: &V) -> &Self::Key;
}

/// Key extraction for set-like containers, the value is the key.
pub struct SelfKey;

impl<K> KeyOf<K> for SelfKey {
    type Key = K;

    #[inline]
    fn key(value: &K) -> &K {
        value
    }
}

/// Key extraction for map-like containers storing `(key, value)` pairs.
pub struct PairKey;

impl<K, W> KeyOf<(K, W)> for PairKey {
    type Key = K;

    #[inline]
    fn key(value: &(K, W)) -> &K {
        &value.0
    }
}

/// Total order over keys. Must be a strict weak ordering for the
/// descent logic to be correct.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The natural order of the key type, via [Ord].
#[derive(Clone, Copy, Default)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Arena, root and the in-order extrema caches. This is the part of the
/// tree the fixup walks operate on; comparator and key extraction never
/// reach them.
pub struct Shape<V> {
    pub(crate) arena: Arena<V>,
    pub(crate) root: usize,
    pub(crate) min: usize,
    pub(crate) max: usize,
}

impl<V> Shape<V> {
    pub(crate) fn minimum(&self, mut x: usize) -> usize {
        while self.arena[x].left != NIL {
            x = self.arena[x].left;
        }
        x
    }

    pub(crate) fn maximum(&self, mut x: usize) -> usize {
        while self.arena[x].right != NIL {
            x = self.arena[x].right;
        }
        x
    }
}

/// Balancing discipline. Two conforming implementations exist,
/// [crate::Avl] and [crate::Rb]; the discipline is chosen at
/// construction through the tree's type parameter and cannot change
/// afterward.
pub trait Balance {
    /// Restore the invariant after `z` was attached as a leaf.
    fn fixup_insert<V>(shape: &mut Shape<V>, z: usize);

    /// Restore the invariant after a splice removed one position from
    /// the tree. `x` (possibly NIL) took over that position under
    /// `x_parent`, and `gone` is the balance metadata the removed
    /// position carried.
    fn fixup_remove<V>(shape: &mut Shape<V>, x: usize, x_parent: usize, gone: i8);

    /// Recompute the invariant bottom-up, without trusting cached
    /// metadata.
    fn validate<V>(shape: &Shape<V>) -> Result<()>;
}

/// Position of one node in a [Tree]. The NIL cursor is the
/// past-the-end position.
///
/// A cursor is invalidated the moment the node it references is
/// removed; dereferencing it afterward may panic or return an
/// unrelated entry. Insertions never invalidate cursors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cursor {
    pub(crate) node: usize,
}

impl Cursor {
    /// The past-the-end position.
    pub const END: Cursor = Cursor { node: NIL };

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node == NIL
    }
}

/// Ordered binary-search-tree engine.
///
/// Parametrised over the stored value `V`, key extraction `X`,
/// comparator `C` and balancing discipline `B`.
pub struct Tree<V, X, C = Natural, B = Rb> {
    shape: Shape<V>,
    comp: C,
    n_count: usize, // number of entries in the tree.
    _marker: marker::PhantomData<(X, B)>,
}

impl<V, X, C, B> Default for Tree<V, X, C, B>
where
    C: Default,
{
    fn default() -> Tree<V, X, C, B> {
        Tree::with_comparator(C::default())
    }
}

impl<V, X, B> Tree<V, X, Natural, B> {
    /// Create an empty tree ordered by the key's natural order.
    pub fn new() -> Tree<V, X, Natural, B> {
        Tree::with_comparator(Natural)
    }
}

impl<V, X, C, B> Tree<V, X, C, B> {
    /// Create an empty tree ordered by `comp`.
    pub fn with_comparator(comp: C) -> Tree<V, X, C, B> {
        Tree {
            shape: Shape {
                arena: Arena::default(),
                root: NIL,
                min: NIL,
                max: NIL,
            },
            comp,
            n_count: 0,
            _marker: marker::PhantomData,
        }
    }
}

/// Maintenance API.
impl<V, X, C, B> Tree<V, X, C, B> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this instance is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Remove every entry. Teardown walks an explicit worklist, so
    /// pathological shapes cannot exhaust the call stack.
    pub fn clear(&mut self) {
        let mut worklist = Vec::new();
        if self.shape.root != NIL {
            worklist.push(self.shape.root);
        }
        while let Some(x) = worklist.pop() {
            let (left, right) = (self.shape.arena[x].left, self.shape.arena[x].right);
            if left != NIL {
                worklist.push(left);
            }
            if right != NIL {
                worklist.push(right);
            }
            self.shape.arena.free(x);
        }
        self.shape.root = NIL;
        self.shape.min = NIL;
        self.shape.max = NIL;
        self.n_count = 0;
    }
}

/// Cursor API. Cursors navigate purely on tree shape; none of these
/// operations mutate the tree.
impl<V, X, C, B> Tree<V, X, C, B> {
    /// Cursor at the in-order first entry; the end cursor when empty.
    #[inline]
    pub fn begin(&self) -> Cursor {
        Cursor {
            node: self.shape.min,
        }
    }

    /// The past-the-end cursor.
    #[inline]
    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// Borrow the value at `pos`, None at end.
    pub fn get(&self, pos: Cursor) -> Option<&V> {
        match pos.node {
            NIL => None,
            node => Some(&self.shape.arena[node].value),
        }
    }

    // In-crate containers use this to overwrite the non-key part of a
    // value in place. Changing the ordering key through it would break
    // the BST invariant.
    pub(crate) fn value_mut(&mut self, pos: Cursor) -> &mut V {
        &mut self.shape.arena[pos.node].value
    }

    /// In-order successor position. Stepping past the last entry yields
    /// the end cursor; `pos` must not be the end cursor.
    pub fn next(&self, pos: Cursor) -> Cursor {
        debug_assert!(!pos.is_end(), "next() on the end cursor");
        Cursor {
            node: self.succ_of(pos.node),
        }
    }

    /// In-order predecessor position. The predecessor of the end cursor
    /// is the last entry; `pos` must not be the begin cursor.
    pub fn prev(&self, pos: Cursor) -> Cursor {
        debug_assert!(
            pos.node != self.shape.min || pos.is_end(),
            "prev() on the begin cursor"
        );
        Cursor {
            node: self.pred_of(pos.node),
        }
    }

    fn succ_of(&self, mut x: usize) -> usize {
        let arena = &self.shape.arena;
        if arena[x].right != NIL {
            return self.shape.minimum(arena[x].right);
        }
        let mut p = arena[x].parent;
        while p != NIL && x == arena[p].right {
            x = p;
            p = arena[p].parent;
        }
        p
    }

    fn pred_of(&self, x: usize) -> usize {
        let arena = &self.shape.arena;
        if x == NIL {
            // predecessor of end is the cached maximum
            return self.shape.max;
        }
        if arena[x].left != NIL {
            return self.shape.maximum(arena[x].left);
        }
        let mut x = x;
        let mut p = arena[x].parent;
        while p != NIL && x == arena[p].left {
            x = p;
            p = arena[p].parent;
        }
        p
    }

    /// Iterate over all entries in comparator order. The iterator is
    /// double-ended.
    pub fn iter(&self) -> Iter<'_, V, X, C, B> {
        Iter {
            tree: self,
            front: self.shape.min,
            back: NIL,
        }
    }
}

/// Query API. Non-mutating binary descent, independent of the
/// balancing discipline.
impl<V, X, C, B> Tree<V, X, C, B>
where
    X: KeyOf<V>,
{
    fn key(&self, x: usize) -> &X::Key {
        X::key(&self.shape.arena[x].value)
    }

    /// Position of the first entry whose key is not less than `key`;
    /// end when every key is less.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let mut y = NIL;
        let mut x = self.shape.root;
        while x != NIL {
            if self.comp.compare(self.key(x).borrow(), key) != Ordering::Less {
                y = x; // best so far, smaller candidates may sit left
                x = self.shape.arena[x].left;
            } else {
                x = self.shape.arena[x].right;
            }
        }
        Cursor { node: y }
    }

    /// Position of the first entry whose key is greater than `key`;
    /// end when no key is greater.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let mut y = NIL;
        let mut x = self.shape.root;
        while x != NIL {
            if self.comp.compare(self.key(x).borrow(), key) == Ordering::Greater {
                y = x;
                x = self.shape.arena[x].left;
            } else {
                x = self.shape.arena[x].right;
            }
        }
        Cursor { node: y }
    }

    /// Position of an entry matching `key`, end when absent.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let j = self.lower_bound(key);
        match j.node {
            NIL => Cursor::END,
            n if self.comp.compare(self.key(n).borrow(), key) == Ordering::Greater => Cursor::END,
            _ => j,
        }
    }

    /// Half-open window of entries matching `key`, as
    /// `(lower_bound, upper_bound)`.
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Number of entries matching `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let (mut lo, hi) = self.equal_range(key);
        let mut n = 0;
        while lo != hi {
            n += 1;
            lo = self.next(lo);
        }
        n
    }

    /// Iterate over the entries whose keys fall within `range`.
    ///
    /// Panics when the range's start is greater than its end, or when
    /// both are the same excluded bound.
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, V, X, C, B>
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        Q: ?Sized,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Included(s), Bound::Included(e))
            | (Bound::Included(s), Bound::Excluded(e))
            | (Bound::Excluded(s), Bound::Included(e))
                if self.comp.compare(s, e) == Ordering::Greater =>
            {
                panic!("range start is greater than range end")
            }
            (Bound::Excluded(s), Bound::Excluded(e)) => match self.comp.compare(s, e) {
                Ordering::Greater => panic!("range start is greater than range end"),
                Ordering::Equal => panic!("range start and end are equal and excluded"),
                Ordering::Less => (),
            },
            _ => (),
        }
        let front = match range.start_bound() {
            Bound::Unbounded => self.shape.min,
            Bound::Included(q) => self.lower_bound(q).node,
            Bound::Excluded(q) => self.upper_bound(q).node,
        };
        let back = match range.end_bound() {
            Bound::Unbounded => NIL,
            Bound::Included(q) => self.upper_bound(q).node,
            Bound::Excluded(q) => self.lower_bound(q).node,
        };
        Iter {
            tree: self,
            front,
            back,
        }
    }
}

type Spliced = (usize, usize, i8); // (x, x_parent, removed metadata)

/// Mutation API.
impl<V, X, C, B> Tree<V, X, C, B>
where
    X: KeyOf<V>,
    C: Comparator<X::Key>,
    B: Balance,
{
    /// Insert `value` unless an entry with an equal key exists. Return
    /// the entry's position along with whether it was inserted; on a
    /// duplicate the existing position is returned, nothing is
    /// allocated and `value` is dropped.
    pub fn insert_unique(&mut self, value: V) -> (Cursor, bool) {
        let mut x = self.shape.root;
        let mut y = NIL;
        let mut less = true;
        while x != NIL {
            y = x;
            less = self.comp.compare(X::key(&value), self.key(x)) == Ordering::Less;
            x = if less {
                self.shape.arena[x].left
            } else {
                self.shape.arena[x].right
            };
        }

        // The descent parked us next to any equal key: when the last
        // step went left, the only candidate duplicate is y's in-order
        // predecessor, otherwise y itself.
        let mut j = y;
        if less {
            if j == self.shape.min {
                // covers the empty tree, min == NIL == y
                let z = self.attach(y, true, value);
                return (Cursor { node: z }, true);
            }
            j = self.pred_of(j);
        }

        if self.comp.compare(self.key(j), X::key(&value)) == Ordering::Less {
            let z = self.attach(y, less, value);
            (Cursor { node: z }, true)
        } else {
            (Cursor { node: j }, false)
        }
    }

    /// Insert `value` regardless of equal keys; equal keys land to the
    /// right of the existing run. Relative order among equal keys is
    /// not preserved across rebalancing rotations.
    pub fn insert_equal(&mut self, value: V) -> Cursor {
        let mut x = self.shape.root;
        let mut y = NIL;
        let mut less = true;
        while x != NIL {
            y = x;
            less = self.comp.compare(X::key(&value), self.key(x)) == Ordering::Less;
            x = if less {
                self.shape.arena[x].left
            } else {
                self.shape.arena[x].right
            };
        }
        let z = self.attach(y, less, value);
        Cursor { node: z }
    }

    // Attach a fully formed leaf under `p` (NIL for the empty tree),
    // refresh the extrema caches and run the discipline's insert fixup.
    fn attach(&mut self, p: usize, insert_left: bool, value: V) -> usize {
        let z = self.shape.arena.alloc(value);
        self.shape.arena[z].parent = p;
        if p == NIL {
            self.shape.root = z;
            self.shape.min = z;
            self.shape.max = z;
        } else if insert_left {
            self.shape.arena[p].left = z;
            if p == self.shape.min {
                self.shape.min = z;
            }
        } else {
            self.shape.arena[p].right = z;
            if p == self.shape.max {
                self.shape.max = z;
            }
        }
        B::fixup_insert(&mut self.shape, z);
        self.n_count += 1;
        z
    }

    /// Remove the entry at `pos` and return its value. `pos` must not
    /// be the end cursor. Cursors at other entries, the spliced-in
    /// successor included, stay valid.
    pub fn remove_at(&mut self, pos: Cursor) -> V {
        debug_assert!(!pos.is_end(), "remove_at() on the end cursor");
        let (x, x_parent, gone) = self.unlink(pos.node);
        B::fixup_remove(&mut self.shape, x, x_parent, gone);
        self.n_count -= 1;
        self.shape.arena.free(pos.node)
    }

    /// Remove every entry matching `key`, return how many were removed.
    pub fn remove<Q>(&mut self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let (mut lo, hi) = self.equal_range(key);
        let mut n = 0;
        while lo != hi {
            let next = self.next(lo);
            self.remove_at(lo);
            lo = next;
            n += 1;
        }
        n
    }

    /// Remove the entries in the half-open cursor window
    /// `[first, last)`.
    pub fn remove_range(&mut self, mut first: Cursor, last: Cursor) {
        if first == self.begin() && last.is_end() {
            self.clear();
        } else {
            while first != last {
                let next = self.next(first);
                self.remove_at(first);
                first = next;
            }
        }
    }

    // Unlink one position from the tree without touching node values.
    //
    // With at most one child, that child replaces `z` in place. With
    // two children, the in-order successor `y` (leftmost of the right
    // subtree, so it has no left child) is relinked into z's structural
    // position and assumes z's metadata; y's own metadata is what
    // physically left the tree and is handed to the fixup.
    fn unlink(&mut self, z: usize) -> Spliced {
        let shape = &mut self.shape;
        let mut y = z;
        let x;
        let x_parent;

        if shape.arena[y].left == NIL {
            x = shape.arena[y].right; // x might be NIL
        } else if shape.arena[y].right == NIL {
            x = shape.arena[y].left;
        } else {
            y = shape.minimum(shape.arena[y].right);
            x = shape.arena[y].right;
        }

        let gone;
        if y != z {
            // two children: y takes over z's position by identity
            let (zl, zr, zp) = (shape.arena[z].left, shape.arena[z].right, shape.arena[z].parent);
            shape.arena[zl].parent = y;
            shape.arena[y].left = zl;
            if y != zr {
                x_parent = shape.arena[y].parent;
                if x != NIL {
                    shape.arena[x].parent = x_parent;
                }
                shape.arena[x_parent].left = x;
                shape.arena[y].right = zr;
                shape.arena[zr].parent = y;
            } else {
                x_parent = y;
            }
            if shape.root == z {
                shape.root = y;
            } else if shape.arena[zp].left == z {
                shape.arena[zp].left = y;
            } else {
                shape.arena[zp].right = y;
            }
            shape.arena[y].parent = zp;
            gone = shape.arena[y].meta;
            shape.arena[y].meta = shape.arena[z].meta;
            // z had two children, so it cannot be the cached min or max
        } else {
            // at most one child: x replaces z in place
            x_parent = shape.arena[z].parent;
            if x != NIL {
                shape.arena[x].parent = x_parent;
            }
            if shape.root == z {
                shape.root = x;
            } else if shape.arena[x_parent].left == z {
                shape.arena[x_parent].left = x;
            } else {
                shape.arena[x_parent].right = x;
            }
            if shape.min == z {
                shape.min = if shape.arena[z].right == NIL {
                    x_parent // NIL when z was the last entry
                } else {
                    shape.minimum(x)
                };
            }
            if shape.max == z {
                shape.max = if shape.arena[z].left == NIL {
                    x_parent
                } else {
                    shape.maximum(x)
                };
            }
            gone = shape.arena[z].meta;
        }
        (x, x_parent, gone)
    }

    /// Validate the tree against everything it promises:
    ///
    /// * The discipline's balance invariant, recomputed bottom-up
    ///   without trusting cached metadata.
    /// * Keys in comparator order along in-order traversal.
    /// * Parent links mirror child links; extrema caches are exact.
    /// * Entry count matches both the traversal and the arena.
    pub fn validate(&self) -> Result<()>
    where
        X::Key: fmt::Debug,
    {
        B::validate(&self.shape)?;

        if self.n_count != self.shape.arena.len() {
            err_at!(
                Fatal,
                msg: "count {} arena {}", self.n_count, self.shape.arena.len()
            )?;
        }

        let mut worklist = Vec::new();
        if self.shape.root != NIL {
            if self.shape.arena[self.shape.root].parent != NIL {
                err_at!(Fatal, msg: "root has a parent")?;
            }
            worklist.push(self.shape.root);
        } else if self.n_count != 0 {
            err_at!(Fatal, msg: "no root with count {}", self.n_count)?;
        }
        let mut seen = 0;
        while let Some(x) = worklist.pop() {
            seen += 1;
            let (left, right) = (self.shape.arena[x].left, self.shape.arena[x].right);
            if left != NIL {
                if self.shape.arena[left].parent != x {
                    err_at!(Fatal, msg: "parent link broken at {}", left)?;
                }
                worklist.push(left);
            }
            if right != NIL {
                if self.shape.arena[right].parent != x {
                    err_at!(Fatal, msg: "parent link broken at {}", right)?;
                }
                worklist.push(right);
            }
        }
        if seen != self.n_count {
            err_at!(Fatal, msg: "reachable {} count {}", seen, self.n_count)?;
        }

        match self.shape.root {
            NIL => {
                if self.shape.min != NIL || self.shape.max != NIL {
                    err_at!(Fatal, msg: "extrema cached on empty tree")?;
                }
            }
            root => {
                if self.shape.min != self.shape.minimum(root) {
                    err_at!(Fatal, msg: "stale min cache")?;
                }
                if self.shape.max != self.shape.maximum(root) {
                    err_at!(Fatal, msg: "stale max cache")?;
                }
            }
        }

        let mut cur = self.shape.min;
        let mut prev = NIL;
        while cur != NIL {
            if prev != NIL {
                let (a, b) = (self.key(prev), self.key(cur));
                if self.comp.compare(a, b) == Ordering::Greater {
                    err_at!(Fatal, msg: "sort {:?} before {:?}", a, b)?;
                }
            }
            prev = cur;
            cur = self.succ_of(cur);
        }

        Ok(())
    }
}

/// Double-ended iterator over a half-open cursor window of a [Tree].
pub struct Iter<'a, V, X, C, B> {
    tree: &'a Tree<V, X, C, B>,
    front: usize, // next entry to yield from the front
    back: usize,  // exclusive back bound
}

impl<'a, V, X, C, B> Iterator for Iter<'a, V, X, C, B> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let node = self.front;
        self.front = self.tree.succ_of(node);
        Some(&self.tree.shape.arena[node].value)
    }
}

impl<'a, V, X, C, B> DoubleEndedIterator for Iter<'a, V, X, C, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.tree.pred_of(self.back);
        Some(&self.tree.shape.arena[self.back].value)
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
