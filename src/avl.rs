//! Module implement the height-balance discipline, [Avl] type.
//!
//! Every node caches its balance factor, right-subtree height minus
//! left-subtree height, constrained to {-1, 0, 1}. Insertion restores
//! the invariant with at most one single or double rotation; deletion
//! may have to rotate at every level on the way to the root, because
//! removing a node can shorten an ancestor's subtree at each step.

use crate::{
    node::NIL,
    tree::{Balance, Shape},
    Error, Result,
};

/// Height-balance (AVL) discipline for [crate::Tree].
pub struct Avl;

impl Balance for Avl {
    fn fixup_insert<V>(shape: &mut Shape<V>, z: usize) {
        // a fresh leaf is balanced; arena slots start with meta 0
        let mut x = z;
        while x != shape.root {
            let p = shape.arena[x].parent;
            match shape.arena[p].meta {
                0 => {
                    // p's subtree grew by one, lean toward the insertion
                    // side and keep climbing
                    shape.arena[p].meta = if x == shape.arena[p].left { -1 } else { 1 };
                    x = p;
                }
                1 => {
                    if x == shape.arena[p].left {
                        // grew on the short side, p absorbs the height
                        shape.arena[p].meta = 0;
                    } else if shape.arena[x].meta == -1 {
                        rotate_right_left(shape, p);
                    } else {
                        rotate_left(shape, p);
                    }
                    // one rotation always suffices after an insert
                    return;
                }
                -1 => {
                    if x != shape.arena[p].left {
                        shape.arena[p].meta = 0;
                    } else if shape.arena[x].meta == 1 {
                        rotate_left_right(shape, p);
                    } else {
                        rotate_right(shape, p);
                    }
                    return;
                }
                _ => panic!("balance factor out of range? call the programmer"),
            }
        }
    }

    fn fixup_remove<V>(shape: &mut Shape<V>, x: usize, x_parent: usize, _gone: i8) {
        let (mut x, mut xp) = (x, x_parent);
        while x != shape.root {
            match shape.arena[xp].meta {
                0 => {
                    // xp now leans away from the removal side; its
                    // height is unchanged, nothing propagates
                    shape.arena[xp].meta = if x == shape.arena[xp].right { -1 } else { 1 };
                    return;
                }
                -1 => {
                    if x == shape.arena[xp].left {
                        shape.arena[xp].meta = 0;
                        x = xp;
                        xp = shape.arena[x].parent;
                    } else {
                        // removed on the short right side, shorten the left
                        let a = shape.arena[xp].left;
                        if shape.arena[a].meta == 1 {
                            rotate_left_right(shape, xp);
                        } else {
                            rotate_right(shape, xp);
                        }
                        x = shape.arena[xp].parent;
                        xp = shape.arena[x].parent;
                        if shape.arena[x].meta == 1 {
                            // single rotation left the subtree height
                            // unchanged, deficit absorbed
                            return;
                        }
                    }
                }
                1 => {
                    if x == shape.arena[xp].right {
                        shape.arena[xp].meta = 0;
                        x = xp;
                        xp = shape.arena[x].parent;
                    } else {
                        let a = shape.arena[xp].right;
                        if shape.arena[a].meta == -1 {
                            rotate_right_left(shape, xp);
                        } else {
                            rotate_left(shape, xp);
                        }
                        x = shape.arena[xp].parent;
                        xp = shape.arena[x].parent;
                        if shape.arena[x].meta == -1 {
                            return;
                        }
                    }
                }
                _ => panic!("balance factor out of range? call the programmer"),
            }
        }
    }

    fn validate<V>(shape: &Shape<V>) -> Result<()> {
        check_node(shape, shape.root).map(|_| ())
    }
}

//              |                |
//              x                y
//             / \              / \
//            a   y      =>    x   c
//               / \          / \
//             [b]  c        a  [b]
//
fn rotate_left<V>(shape: &mut Shape<V>, x: usize) {
    let y = shape.arena[x].right;
    let b = shape.arena[y].left;
    let xp = shape.arena[x].parent;

    shape.arena[x].right = b;
    shape.arena[y].left = x;
    shape.arena[y].parent = xp;
    shape.arena[x].parent = y;
    if b != NIL {
        shape.arena[b].parent = x;
    }

    if x == shape.root {
        shape.root = y;
    } else if shape.arena[xp].right == x {
        shape.arena[xp].right = y;
    } else {
        shape.arena[xp].left = y;
    }

    if shape.arena[y].meta == 1 {
        // y's right was the taller side, both settle
        shape.arena[y].meta = 0;
        shape.arena[x].meta = 0;
    } else {
        // y was even; only the delete walk produces this shape, the
        // subtree keeps its height
        shape.arena[y].meta = -1;
        shape.arena[x].meta = 1;
    }
}

//              |                |
//              x                y
//             / \              / \
//            y   a      =>    c   x
//           / \                  / \
//          c  [b]              [b]  a
//
fn rotate_right<V>(shape: &mut Shape<V>, x: usize) {
    let y = shape.arena[x].left;
    let b = shape.arena[y].right;
    let xp = shape.arena[x].parent;

    shape.arena[x].left = b;
    shape.arena[y].right = x;
    shape.arena[y].parent = xp;
    shape.arena[x].parent = y;
    if b != NIL {
        shape.arena[b].parent = x;
    }

    if x == shape.root {
        shape.root = y;
    } else if shape.arena[xp].right == x {
        shape.arena[xp].right = y;
    } else {
        shape.arena[xp].left = y;
    }

    if shape.arena[y].meta == -1 {
        shape.arena[y].meta = 0;
        shape.arena[x].meta = 0;
    } else {
        shape.arena[y].meta = 1;
        shape.arena[x].meta = -1;
    }
}

//          |                     |
//          a                     c
//         / \                   / \
//        b   g                 /   \
//       / \         =>        b     a
//      d   c                 / \   / \
//         / \               d   e f   g
//        e   f
//
// a leans left by two, b leans right: rotate b left then a right, c
// surfaces and the balance of a and b falls out of where c leaned.
fn rotate_left_right<V>(shape: &mut Shape<V>, a: usize) {
    let b = shape.arena[a].left;
    let c = shape.arena[b].right;
    let ap = shape.arena[a].parent;

    // a and b adopt c's children
    shape.arena[a].left = shape.arena[c].right;
    shape.arena[b].right = shape.arena[c].left;
    shape.arena[c].right = a;
    shape.arena[c].left = b;

    shape.arena[c].parent = ap;
    shape.arena[a].parent = c;
    shape.arena[b].parent = c;

    let f = shape.arena[a].left;
    if f != NIL {
        shape.arena[f].parent = a;
    }
    let e = shape.arena[b].right;
    if e != NIL {
        shape.arena[e].parent = b;
    }

    if a == shape.root {
        shape.root = c;
    } else if shape.arena[ap].left == a {
        shape.arena[ap].left = c;
    } else {
        shape.arena[ap].right = c;
    }

    match shape.arena[c].meta {
        -1 => {
            // e was the taller grandchild
            shape.arena[a].meta = 1;
            shape.arena[b].meta = 0;
        }
        0 => {
            shape.arena[a].meta = 0;
            shape.arena[b].meta = 0;
        }
        1 => {
            // f was the taller grandchild
            shape.arena[a].meta = 0;
            shape.arena[b].meta = -1;
        }
        _ => panic!("balance factor out of range? call the programmer"),
    }
    shape.arena[c].meta = 0;
}

//          |                     |
//          a                     c
//         / \                   / \
//        d   b                 /   \
//           / \     =>        a     b
//          c   g             / \   / \
//         / \               d   e f   g
//        e   f
//
fn rotate_right_left<V>(shape: &mut Shape<V>, a: usize) {
    let b = shape.arena[a].right;
    let c = shape.arena[b].left;
    let ap = shape.arena[a].parent;

    shape.arena[a].right = shape.arena[c].left;
    shape.arena[b].left = shape.arena[c].right;
    shape.arena[c].left = a;
    shape.arena[c].right = b;

    shape.arena[c].parent = ap;
    shape.arena[a].parent = c;
    shape.arena[b].parent = c;

    let e = shape.arena[a].right;
    if e != NIL {
        shape.arena[e].parent = a;
    }
    let f = shape.arena[b].left;
    if f != NIL {
        shape.arena[f].parent = b;
    }

    if a == shape.root {
        shape.root = c;
    } else if shape.arena[ap].left == a {
        shape.arena[ap].left = c;
    } else {
        shape.arena[ap].right = c;
    }

    match shape.arena[c].meta {
        -1 => {
            shape.arena[a].meta = 0;
            shape.arena[b].meta = 1;
        }
        0 => {
            shape.arena[a].meta = 0;
            shape.arena[b].meta = 0;
        }
        1 => {
            shape.arena[a].meta = -1;
            shape.arena[b].meta = 0;
        }
        _ => panic!("balance factor out of range? call the programmer"),
    }
    shape.arena[c].meta = 0;
}

// Recompute subtree heights bottom-up and compare against the cached
// factors; returns the subtree height.
fn check_node<V>(shape: &Shape<V>, x: usize) -> Result<isize> {
    if x == NIL {
        return Ok(0);
    }
    let lh = check_node(shape, shape.arena[x].left)?;
    let rh = check_node(shape, shape.arena[x].right)?;

    let diff = rh - lh;
    if !(-1..=1).contains(&diff) {
        err_at!(Fatal, msg: "height difference {} at node {}", diff, x)?;
    }
    if diff != shape.arena[x].meta as isize {
        err_at!(Fatal, msg: "cached factor {} actual {}", shape.arena[x].meta, diff)?;
    }
    Ok(lh.max(rh) + 1)
}
