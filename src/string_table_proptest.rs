#![cfg(test)]

// Property tests for StringTable kept inside the crate so they can inspect
// the slot array and inject allocation faults.

use crate::alloc::fault;
use crate::slot::Slot;
use crate::string_table::{Insert, StringTable};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    StopAfter(usize),
    // Insert while the next allocation fails.
    InsertFailing(usize, i32),
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (0usize..12, proptest::collection::vec("[a-z]{0,5}", 1..=12)).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => (0usize..8).prop_map(OpI::StopAfter),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertFailing(i, v)),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

// Structural checks on the slot array after every op:
// - `len` equals the number of occupied slots;
// - no key occupies two slots;
// - every live key is reachable by lookup.
fn check_structure<S: BuildHasher>(sut: &StringTable<i32, S>) -> Result<(), TestCaseError> {
    let keys: Vec<&str> = sut.iter().map(|(k, _)| k).collect();
    prop_assert_eq!(keys.len(), sut.len());
    let distinct: BTreeSet<&str> = keys.iter().copied().collect();
    prop_assert_eq!(distinct.len(), keys.len(), "duplicate key in slot array");
    for k in keys {
        prop_assert!(sut.contains_key(k), "live key {:?} unreachable", k);
    }
    Ok(())
}

fn run_state_machine<S: BuildHasher>(
    mut sut: StringTable<i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let before_cap = sut.capacity();
                match sut.insert(k, v) {
                    Insert::Inserted => {
                        prop_assert!(model.insert(k.clone(), v).is_none(), "new key must not exist");
                        prop_assert!(sut.load_factor() < sut.config().max_load_factor);
                        prop_assert!(sut.capacity() >= before_cap);
                    }
                    Insert::Replaced(old) => {
                        let prev = model.insert(k.clone(), v);
                        prop_assert_eq!(Some(old), prev);
                        prop_assert_eq!(sut.capacity(), before_cap, "replace must not grow");
                    }
                    Insert::Rejected { error, .. } => {
                        prop_assert!(false, "unexpected rejection: {}", error);
                    }
                }
            }
            OpI::InsertFailing(i, v) => {
                let k = &pool[i];
                let before_cap = sut.capacity();
                let before_len = sut.len();
                fault::fail_next(1);
                let res = sut.insert(k, v);
                fault::disarm();
                prop_assert_eq!(sut.capacity(), before_cap, "failed growth must not resize");
                match res {
                    Insert::Inserted => {
                        prop_assert!(model.insert(k.clone(), v).is_none());
                    }
                    Insert::Replaced(old) => {
                        prop_assert_eq!(Some(old), model.insert(k.clone(), v));
                    }
                    Insert::Rejected { value, .. } => {
                        prop_assert_eq!(value, v);
                        prop_assert_eq!(sut.len(), before_len);
                        prop_assert_eq!(sut.get(k), model.get(k));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.contains_key(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(vr) = sut.get_mut(k) {
                    *vr = vr.saturating_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Iterate => {
                let mut seen = Vec::new();
                let n = sut.for_each(|k, v| {
                    seen.push((k.to_string(), *v));
                    true
                });
                prop_assert_eq!(n, model.len());
                let s: BTreeSet<_> = seen.into_iter().collect();
                let m: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
            OpI::StopAfter(n) => {
                let mut calls = 0usize;
                let visited = sut.for_each(|_, _| {
                    calls += 1;
                    calls <= n
                });
                prop_assert_eq!(visited, (n + 1).min(model.len()));
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert reports Inserted exactly for new keys and Replaced(old) otherwise;
// - remove/get/contains_key agree with the model, through tombstones;
// - for_each visits every entry once and stops right after the first false;
// - len/is_empty parity and the load threshold hold after each op;
// - failed growth leaves capacity unchanged and never loses entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario()) {
        let sut: StringTable<i32> = StringTable::with_capacity(cap).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

// Collision variant: a constant hasher puts every key on one probe run,
// so mixed insert/remove/insert sequences stress tombstone handling.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((cap, pool, ops) in arb_scenario()) {
        let sut: StringTable<i32, ConstBuildHasher> =
            StringTable::with_capacity_and_hasher(cap, ConstBuildHasher).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

// Property: after removing A and inserting B on the same probe run, B lands
// at or before A's old slot.
proptest! {
    #[test]
    fn prop_tombstone_reuse(pre in 0usize..5) {
        let mut t: StringTable<i32, ConstBuildHasher> =
            StringTable::with_capacity_and_hasher(16, ConstBuildHasher).unwrap();
        for i in 0..pre {
            let _ = t.insert(&format!("pre{i}"), i as i32);
        }
        let _ = t.insert("A", -1);
        let slot_of = |t: &StringTable<i32, ConstBuildHasher>, key: &str| {
            t.slots_for_test().iter().position(|s| s.holds(key))
        };
        let a_at = slot_of(&t, "A").expect("A stored");
        prop_assert_eq!(t.remove("A"), Some(-1));
        prop_assert_eq!(&t.slots_for_test()[a_at], &Slot::Tombstone);

        let _ = t.insert("B", -2);
        let b_at = slot_of(&t, "B").expect("B stored");
        prop_assert!(b_at <= a_at);
        prop_assert_eq!(t.len(), pre + 1);
        prop_assert!(!t.contains_key("A"));
    }
}
