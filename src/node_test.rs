use super::*;

#[test]
fn test_arena_alloc_free() {
    let mut arena: Arena<u64> = Arena::default();
    assert_eq!(arena.len(), 0);

    let a = arena.alloc(100);
    let b = arena.alloc(200);
    let c = arena.alloc(300);
    assert_eq!((a, b, c), (0, 1, 2));
    assert_eq!(arena.len(), 3);

    assert_eq!(arena[b].value, 200);
    assert_eq!(arena[b].parent, NIL);
    assert_eq!(arena[b].left, NIL);
    assert_eq!(arena[b].right, NIL);
    assert_eq!(arena[b].meta, 0);

    arena[b].left = a;
    arena[b].right = c;
    assert_eq!(arena[b].left, 0);
    assert_eq!(arena[b].right, 2);

    assert_eq!(arena.free(b), 200);
    assert_eq!(arena.len(), 2);

    // freed slot is recycled, live indexes stay put
    let d = arena.alloc(400);
    assert_eq!(d, b);
    assert_eq!(arena.len(), 3);
    assert_eq!(arena[a].value, 100);
    assert_eq!(arena[c].value, 300);
    assert_eq!(arena[d].value, 400);
    assert_eq!(arena[d].meta, 0);
    assert_eq!(arena[d].left, NIL);
}

#[test]
#[should_panic(expected = "vacant slot")]
fn test_arena_double_free() {
    let mut arena: Arena<u64> = Arena::default();
    let a = arena.alloc(1);
    arena.free(a);
    arena.free(a);
}

#[test]
#[should_panic(expected = "vacant slot")]
fn test_arena_index_vacant() {
    let mut arena: Arena<u64> = Arena::default();
    let a = arena.alloc(1);
    arena.free(a);
    let _node = &arena[a];
}
