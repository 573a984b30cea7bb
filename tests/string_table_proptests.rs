// StringTable property tests (public API).
//
// Property 1: round trip and overwrite against a model map.
//  - Model: BTreeMap<String, u32>.
//  - Invariant: get(k) == model.get(k) for every key in the pool;
//               len() == model.len(); Inserted iff the key was new.
//
// Property 2: growth preserves contents.
//  - Insert n distinct keys into a table of random initial capacity.
//  - Invariant: every capacity change is a doubling; load factor stays
//    below the threshold; every key maps to its value afterwards.
//
// Property 3: for_each with an early stop after N visits returns N + 1
// (capped at len), and a full walk visits each entry once.
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use strtab::{Insert, StringTable, MAX_LOAD_FACTOR};

proptest! {
    #[test]
    fn prop_round_trip_and_overwrite(
        ops in proptest::collection::vec(("[a-e]{1,2}", any::<u32>(), any::<bool>()), 1..200)
    ) {
        let mut t = StringTable::new();
        let mut model: BTreeMap<String, u32> = BTreeMap::new();
        for (key, value, remove) in ops {
            if remove {
                prop_assert_eq!(t.remove(&key), model.remove(&key));
                prop_assert!(!t.contains_key(&key));
            } else {
                let was_new = !model.contains_key(&key);
                match t.insert(&key, value) {
                    Insert::Inserted => prop_assert!(was_new),
                    Insert::Replaced(old) => {
                        prop_assert!(!was_new);
                        prop_assert_eq!(Some(&old), model.get(&key));
                    }
                    Insert::Rejected { error, .. } => prop_assert!(false, "rejected: {}", error),
                }
                model.insert(key.clone(), value);
                prop_assert_eq!(t.get(&key), Some(&value));
            }
            prop_assert_eq!(t.len(), model.len());
        }
        for (k, v) in &model {
            prop_assert_eq!(t.get(k), Some(v));
        }
    }
}

proptest! {
    #[test]
    fn prop_growth_preserves_contents(initial in 0usize..64, n in 0usize..300) {
        let mut t = StringTable::with_capacity(initial).unwrap();
        let mut cap = t.capacity();
        for i in 0..n {
            let _ = t.insert(&format!("k{i}"), i);
            if t.capacity() != cap {
                prop_assert_eq!(t.capacity(), cap * 2);
                cap = t.capacity();
            }
            prop_assert!(t.load_factor() < MAX_LOAD_FACTOR);
        }
        prop_assert_eq!(t.len(), n);
        for i in 0..n {
            prop_assert_eq!(t.get(&format!("k{i}")), Some(&i));
        }
    }
}

proptest! {
    #[test]
    fn prop_for_each_counts(keys in proptest::collection::btree_set("[a-z]{1,4}", 0..40), stop in 0usize..50) {
        let mut t = StringTable::new();
        for k in &keys {
            let _ = t.insert(k, ());
        }

        let mut seen = BTreeSet::new();
        let all = t.for_each(|k, _| {
            seen.insert(k.to_string());
            true
        });
        prop_assert_eq!(all, keys.len());
        prop_assert_eq!(&seen, &keys);

        let mut calls = 0usize;
        let visited = t.for_each(|_, _| {
            calls += 1;
            calls <= stop
        });
        prop_assert_eq!(visited, (stop + 1).min(keys.len()));
        prop_assert_eq!(visited, calls);
    }
}
