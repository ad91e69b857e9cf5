use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;

use std::{collections::BTreeMap, ops::Bound};

use crate::avl::Avl;

fn fuzz_omap<B: Balance>(name: &str) {
    let seed: u64 = random();
    // let seed: u64 = 8153870164369125467;
    println!("fuzz_omap {} {}", name, seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: OMap<u8, u64, Natural, B> = OMap::new();
    let mut btmap: BTreeMap<u8, u64> = BTreeMap::new();

    let mut counts = [0_usize; 13];

    for _i in 0..200_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btmap.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btmap.is_empty());
            }
            Op::Set(key, val) => {
                counts[2] += 1;
                match (index.set(key, val), btmap.insert(key, val)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => assert_eq!(v, r, "for key {}", key),
                    (None, Some(_)) => panic!("set no key {} in omap", key),
                    (Some(_), None) => panic!("set no key {} in btree", key),
                }
            }
            Op::Delete(key) => {
                counts[3] += 1;
                match (index.remove(&key), btmap.remove(&key)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => assert_eq!(v, r, "for key {}", key),
                    (None, Some(_)) => panic!("remove no key {} in omap", key),
                    (Some(_), None) => panic!("remove no key {} in btree", key),
                }
            }
            Op::Validate => {
                counts[4] += 1;
                index.validate().unwrap();
            }
            Op::Get(key) => {
                counts[5] += 1;
                match (index.get(&key), btmap.get(&key)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => assert_eq!(v, r, "for key {}", key),
                    (None, Some(_)) => panic!("get no key {} in omap", key),
                    (Some(_), None) => panic!("get no key {} in btree", key),
                }
            }
            Op::GetMut(key) => {
                counts[6] += 1;
                match (index.get_mut(&key), btmap.get_mut(&key)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => {
                        assert_eq!(v, r, "for key {}", key);
                        *v = v.wrapping_add(1);
                        *r = r.wrapping_add(1);
                    }
                    (None, Some(_)) => panic!("get_mut no key {} in omap", key),
                    (Some(_), None) => panic!("get_mut no key {} in btree", key),
                }
            }
            Op::ContainsKey(key) => {
                counts[7] += 1;
                assert_eq!(index.contains_key(&key), btmap.contains_key(&key));
            }
            Op::FirstLast => {
                counts[8] += 1;
                let f = btmap.iter().next().map(|(k, v)| (k, v));
                assert_eq!(index.first_key_value(), f);
                let l = btmap.iter().next_back().map(|(k, v)| (k, v));
                assert_eq!(index.last_key_value(), l);
            }
            Op::Iter => {
                counts[9] += 1;
                let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b);
            }
            Op::Range((l, h)) if asc_range(&l, &h) => {
                counts[10] += 1;
                let r = (Bound::from(l), Bound::from(h));
                let a: Vec<(u8, u64)> = index.range(r).map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.range(r).map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b, "range {:?}", r);
            }
            // inverted ranges panic, same as BTreeMap; skip them
            Op::Range(_) => (),
            Op::Reverse((l, h)) if asc_range(&l, &h) => {
                counts[11] += 1;
                let r = (Bound::from(l), Bound::from(h));
                let a: Vec<(u8, u64)> = index.range(r).rev().map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.range(r).rev().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b, "reverse {:?}", r);
            }
            Op::Reverse(_) => (),
            Op::Extend(items) => {
                counts[12] += 1;
                index.extend(items.clone());
                btmap.extend(items)
            }
        }
    }

    let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(a, b);
    index.validate().unwrap();

    println!(
        "fuzz_omap {} counts {:?} len:{}/{}",
        name,
        counts,
        index.len(),
        btmap.len()
    );
}

#[test]
fn test_omap_avl() {
    fuzz_omap::<Avl>("avl")
}

#[test]
fn test_omap_rb() {
    fuzz_omap::<Rb>("rb")
}

#[test]
fn test_omap_from_iter() {
    let index: OMap<u8, u64> = vec![(3, 30), (1, 10), (2, 20), (1, 11)]
        .into_iter()
        .collect();
    assert_eq!(index.len(), 3);
    assert_eq!(index.get(&1), Some(&11)); // later pair wins
    let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(a, vec![(1, 11), (2, 20), (3, 30)]);
}

#[test]
fn test_omap_comparator() {
    let comp = |a: &u8, b: &u8| b.cmp(a); // descending
    let mut index: OMap<u8, u64, _> = OMap::with_comparator(comp);
    index.set(1, 10);
    index.set(3, 30);
    index.set(2, 20);
    let keys: Vec<u8> = index.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![3, 2, 1]);
    assert_eq!(index.first_key_value(), Some((&3, &30)));
    assert_eq!(index.last_key_value(), Some((&1, &10)));
    index.validate().unwrap();
}

#[derive(Debug, Arbitrary)]
enum Op<K, V> {
    Len,
    IsEmpty,
    Set(K, V),
    Delete(K),
    Validate,
    Get(K),
    GetMut(K),
    ContainsKey(K),
    FirstLast,
    Iter,
    Range((Limit<K>, Limit<K>)),
    Reverse((Limit<K>, Limit<K>)),
    Extend(Vec<(K, V)>),
}

#[derive(Debug, Arbitrary, Eq, PartialEq)]
enum Limit<T> {
    Unbounded,
    Included(T),
    Excluded(T),
}

fn asc_range<T: PartialOrd>(from: &Limit<T>, to: &Limit<T>) -> bool {
    match (from, to) {
        (Limit::Unbounded, _) => true,
        (_, Limit::Unbounded) => true,
        (Limit::Included(a), Limit::Included(b)) => a <= b,
        (Limit::Included(a), Limit::Excluded(b)) => a <= b,
        (Limit::Excluded(a), Limit::Included(b)) => a <= b,
        (Limit::Excluded(a), Limit::Excluded(b)) => b > a,
    }
}

impl<T> From<Limit<T>> for Bound<T> {
    fn from(limit: Limit<T>) -> Self {
        match limit {
            Limit::Unbounded => Bound::Unbounded,
            Limit::Included(v) => Bound::Included(v),
            Limit::Excluded(v) => Bound::Excluded(v),
        }
    }
}
