use std::ops;

/// Null link. Every parent/left/right field holds either a live arena
/// index or NIL.
pub const NIL: usize = usize::MAX;

// Node corresponds to a single entry in a Tree instance.
//
// `meta` is the per-discipline balance byte: AVL keeps the balance
// factor in {-1, 0, 1} (right height minus left height), red/black
// keeps the color (0 red, 1 black).
pub struct Node<V> {
    pub value: V,
    pub parent: usize, // store: parent link
    pub left: usize,   // store: left child
    pub right: usize,  // store: right child
    pub meta: i8,      // store: balance factor or color
}

/// Arena of fixed-size node slots addressed by index.
///
/// Slots freed by deletion are recycled through a free list, so a live
/// node's index never changes. That index is the node's identity: the
/// engine's cursor-stability guarantee rests on it.
pub struct Arena<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
}

impl<V> Default for Arena<V> {
    fn default() -> Arena<V> {
        Arena {
            slots: Vec::default(),
            free: Vec::default(),
        }
    }
}

impl<V> Arena<V> {
    /// Allocate a slot for a detached node. The node is fully formed
    /// before the caller splices any live link to it.
    pub fn alloc(&mut self, value: V) -> usize {
        let node = Node {
            value,
            parent: NIL,
            left: NIL,
            right: NIL,
            meta: 0,
        };
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Release a node's slot and return its value. The caller must have
    /// unlinked the node already.
    pub fn free(&mut self, index: usize) -> V {
        let node = match self.slots[index].take() {
            Some(node) => node,
            None => panic!("freeing a vacant slot {}? call the programmer", index),
        };
        self.free.push(index);
        node.value
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<V> ops::Index<usize> for Arena<V> {
    type Output = Node<V>;

    fn index(&self, index: usize) -> &Node<V> {
        match &self.slots[index] {
            Some(node) => node,
            None => panic!("indexing a vacant slot {}? call the programmer", index),
        }
    }
}

impl<V> ops::IndexMut<usize> for Arena<V> {
    fn index_mut(&mut self, index: usize) -> &mut Node<V> {
        match &mut self.slots[index] {
            Some(node) => node,
            None => panic!("indexing a vacant slot {}? call the programmer", index),
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
