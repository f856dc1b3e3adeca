use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

// A narrow key window keeps nodes filling and draining, which forces frequent
// splits, merges and borrows.
#[derive(Clone, Copy, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 3)]
    Insert(#[proptest(strategy = "-64i64..64")] i64),
    #[proptest(weight = 2)]
    Delete(#[proptest(strategy = "-64i64..64")] i64),
    Search(#[proptest(strategy = "-64i64..64")] i64),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreeset(min_degree in 2usize..=6, ops in ops_strategy()) {
        let mut t = BTree::new(min_degree).unwrap();
        let mut m: BTreeSet<i64> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(t.insert(key), m.insert(key));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(t.delete(key), m.remove(&key));
                }
                Op::Search(key) => {
                    prop_assert_eq!(t.search(key), m.contains(&key));
                }
            }

            prop_assert_eq!(t.len(), m.len());
            if let Err(violation) = t.validate() {
                return Err(TestCaseError::fail(format!("{violation}\n{t}")));
            }
        }

        let expected: Vec<i64> = m.iter().copied().collect();
        prop_assert_eq!(t.keys(), expected);
    }

    #[test]
    fn prop_keys_sorted_and_unique(min_degree in 2usize..=8, keys in prop::collection::vec(any::<i64>(), 0..500)) {
        let mut t = BTree::new(min_degree).unwrap();
        t.extend(keys.iter().copied());
        prop_assert!(t.validate().is_ok());

        let got = t.keys();
        prop_assert!(got.windows(2).all(|w| w[0] < w[1]));

        let expected: Vec<i64> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_delete_all_leaves_empty_leaf(min_degree in 2usize..=5, keys in prop::collection::vec(-500i64..500, 0..400)) {
        let mut t = BTree::new(min_degree).unwrap();
        t.extend(keys.iter().copied());

        for key in keys.iter().rev() {
            t.delete(*key);
            prop_assert!(!t.search(*key));
            prop_assert!(t.validate().is_ok());
        }

        prop_assert!(t.is_empty());
        prop_assert!(t.keys().is_empty());
        prop_assert!(t.root.leaf);
        prop_assert_eq!(t.height(), 1);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<i64> = (1..=7).collect();

    for min_degree in [2, 3] {
        for_each_permutation(&keys, |perm| {
            let mut t = BTree::new(min_degree).unwrap();
            for &k in &perm {
                assert!(t.insert(k));
                assert_eq!(t.validate(), Ok(()), "order {perm:?}");
            }
            assert_eq!(t.keys(), keys);
        });
    }
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<i64> = (1..=7).collect();

    for min_degree in [2, 3] {
        // Insert in a fixed order, then remove in all permutations.
        let mut base = BTree::new(min_degree).unwrap();
        base.extend(keys.iter().copied());

        for_each_permutation(&keys, |perm| {
            let mut t = base.clone();
            let mut remaining: BTreeSet<i64> = keys.iter().copied().collect();

            for k in perm {
                assert!(t.delete(k));
                remaining.remove(&k);
                assert_eq!(t.validate(), Ok(()));
                assert_eq!(t.keys(), remaining.iter().copied().collect::<Vec<_>>());
            }
            assert!(t.is_empty());
            assert!(t.root.leaf);
        });
    }
}
