//! Module implement the red/black discipline, [Rb] type.
//!
//! Every node carries one color bit; null links count as black. The
//! invariant: a red node never has a red parent, and every path from a
//! node down to a null link crosses the same number of black nodes.
//! Insertion recolors along the red-uncle chain and finishes with at
//! most two rotations. Deletion only works when a black position was
//! removed, propagating the black-height deficit up through the
//! sibling case analysis until it is absorbed.

use crate::{
    node::NIL,
    tree::{Balance, Shape},
    Error, Result,
};

const RED: i8 = 0;
const BLACK: i8 = 1;

/// Red/black discipline for [crate::Tree].
pub struct Rb;

impl Balance for Rb {
    fn fixup_insert<V>(shape: &mut Shape<V>, z: usize) {
        let mut x = z;
        shape.arena[x].meta = RED; // new nodes are always inserted red
        while x != shape.root && shape.arena[shape.arena[x].parent].meta == RED {
            let p = shape.arena[x].parent;
            // a red parent is never the root, so the grandparent is live
            let g = shape.arena[p].parent;
            if p == shape.arena[g].left {
                let u = shape.arena[g].right; // the uncle
                if u != NIL && shape.arena[u].meta == RED {
                    shape.arena[p].meta = BLACK;
                    shape.arena[u].meta = BLACK;
                    shape.arena[g].meta = RED;
                    x = g; // the violation may reappear at g
                } else {
                    if x == shape.arena[p].right {
                        // inner child: rotate onto the outside first
                        x = p;
                        rotate_left(shape, x);
                    }
                    let p = shape.arena[x].parent;
                    let g = shape.arena[p].parent;
                    shape.arena[p].meta = BLACK;
                    shape.arena[g].meta = RED;
                    rotate_right(shape, g);
                }
            } else {
                let u = shape.arena[g].left;
                if u != NIL && shape.arena[u].meta == RED {
                    shape.arena[p].meta = BLACK;
                    shape.arena[u].meta = BLACK;
                    shape.arena[g].meta = RED;
                    x = g;
                } else {
                    if x == shape.arena[p].left {
                        x = p;
                        rotate_right(shape, x);
                    }
                    let p = shape.arena[x].parent;
                    let g = shape.arena[p].parent;
                    shape.arena[p].meta = BLACK;
                    shape.arena[g].meta = RED;
                    rotate_left(shape, g);
                }
            }
        }
        let root = shape.root;
        shape.arena[root].meta = BLACK;
    }

    fn fixup_remove<V>(shape: &mut Shape<V>, x: usize, x_parent: usize, gone: i8) {
        if gone == RED {
            // a red position leaves no black-height deficit behind
            return;
        }
        let (mut x, mut xp) = (x, x_parent);
        while x != shape.root && is_black(shape, x) {
            if x == shape.arena[xp].left {
                // a doubly-black x always has a live sibling
                let mut w = shape.arena[xp].right;
                if shape.arena[w].meta == RED {
                    shape.arena[w].meta = BLACK;
                    shape.arena[xp].meta = RED;
                    rotate_left(shape, xp);
                    w = shape.arena[xp].right;
                }
                if is_black(shape, shape.arena[w].left) && is_black(shape, shape.arena[w].right) {
                    // nothing to borrow from the sibling, move the
                    // deficit up
                    shape.arena[w].meta = RED;
                    x = xp;
                    xp = shape.arena[x].parent;
                } else {
                    if is_black(shape, shape.arena[w].right) {
                        let wl = shape.arena[w].left;
                        if wl != NIL {
                            shape.arena[wl].meta = BLACK;
                        }
                        shape.arena[w].meta = RED;
                        rotate_right(shape, w);
                        w = shape.arena[xp].right;
                    }
                    shape.arena[w].meta = shape.arena[xp].meta;
                    shape.arena[xp].meta = BLACK;
                    let wr = shape.arena[w].right;
                    if wr != NIL {
                        shape.arena[wr].meta = BLACK;
                    }
                    rotate_left(shape, xp);
                    break;
                }
            } else {
                // mirror image, right and left exchanged
                let mut w = shape.arena[xp].left;
                if shape.arena[w].meta == RED {
                    shape.arena[w].meta = BLACK;
                    shape.arena[xp].meta = RED;
                    rotate_right(shape, xp);
                    w = shape.arena[xp].left;
                }
                if is_black(shape, shape.arena[w].right) && is_black(shape, shape.arena[w].left) {
                    shape.arena[w].meta = RED;
                    x = xp;
                    xp = shape.arena[x].parent;
                } else {
                    if is_black(shape, shape.arena[w].left) {
                        let wr = shape.arena[w].right;
                        if wr != NIL {
                            shape.arena[wr].meta = BLACK;
                        }
                        shape.arena[w].meta = RED;
                        rotate_left(shape, w);
                        w = shape.arena[xp].left;
                    }
                    shape.arena[w].meta = shape.arena[xp].meta;
                    shape.arena[xp].meta = BLACK;
                    let wl = shape.arena[w].left;
                    if wl != NIL {
                        shape.arena[wl].meta = BLACK;
                    }
                    rotate_right(shape, xp);
                    break;
                }
            }
        }
        // absorb the deficit: a red x turns black, the root swallows it
        if x != NIL {
            shape.arena[x].meta = BLACK;
        }
    }

    fn validate<V>(shape: &Shape<V>) -> Result<()> {
        if shape.root != NIL && shape.arena[shape.root].meta != BLACK {
            err_at!(Fatal, msg: "red root")?;
        }
        check_node(shape, shape.root, false).map(|_| ())
    }
}

fn is_black<V>(shape: &Shape<V>, x: usize) -> bool {
    x == NIL || shape.arena[x].meta == BLACK
}

//        x              y
//       / \            / \
//      u   y    =>    x   b
//         / \        / \
//        a   b      u   a
//
fn rotate_left<V>(shape: &mut Shape<V>, x: usize) {
    let y = shape.arena[x].right;
    let a = shape.arena[y].left;
    let xp = shape.arena[x].parent;

    shape.arena[x].right = a;
    if a != NIL {
        shape.arena[a].parent = x;
    }
    shape.arena[y].parent = xp;

    if x == shape.root {
        shape.root = y;
    } else if shape.arena[xp].right == x {
        shape.arena[xp].right = y;
    } else {
        shape.arena[xp].left = y;
    }
    shape.arena[y].left = x;
    shape.arena[x].parent = y;
}

//         x             y
//        / \           / \
//       y   u    =>   a   x
//      / \               / \
//     a   b             b   u
//
fn rotate_right<V>(shape: &mut Shape<V>, x: usize) {
    let y = shape.arena[x].left;
    let b = shape.arena[y].right;
    let xp = shape.arena[x].parent;

    shape.arena[x].left = b;
    if b != NIL {
        shape.arena[b].parent = x;
    }
    shape.arena[y].parent = xp;

    if x == shape.root {
        shape.root = y;
    } else if shape.arena[xp].right == x {
        shape.arena[xp].right = y;
    } else {
        shape.arena[xp].left = y;
    }
    shape.arena[y].right = x;
    shape.arena[x].parent = y;
}

// Count blacks down every path and reject red-red links; returns the
// subtree's black height.
fn check_node<V>(shape: &Shape<V>, x: usize, fromred: bool) -> Result<usize> {
    if x == NIL {
        return Ok(0);
    }
    let red = shape.arena[x].meta == RED;
    if fromred && red {
        err_at!(Fatal, msg: "consecutive reds at node {}", x)?;
    }

    let lblacks = check_node(shape, shape.arena[x].left, red)?;
    let rblacks = check_node(shape, shape.arena[x].right, red)?;
    if lblacks != rblacks {
        err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks)?;
    }

    Ok(lblacks + if red { 0 } else { 1 })
}
