#![cfg(test)]

// Property tests for HashyStepTable kept inside the crate so they can
// inspect the slot array directly.

use crate::capacity::CapacityLadder;
use crate::error::TableError;
use crate::hash_engine::StepHasher;
use crate::hashy_step_table::HashyStepTable;
use crate::probe::ProbeSeq;
use crate::slot::Slot;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Get(usize),
    GetMut(usize, i32),
    Delete(usize),
    Contains(String),
    Enumerate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetMut(i, d)),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::Enumerate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Structural invariants that must hold between operations:
// - the number of occupied slots equals `len()`;
// - no key occupies two slots;
// - every occupied key is reached by its own walk before any empty slot.
fn check_structure<V, H>(t: &HashyStepTable<String, V, H>) -> Result<(), TestCaseError>
where
    H: StepHasher<String>,
{
    let slots = t.slots_for_test();
    let occupied: Vec<(usize, &String)> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.entry().map(|(k, _)| (i, k)))
        .collect();
    prop_assert_eq!(occupied.len(), t.len());
    let distinct: BTreeSet<&String> = occupied.iter().map(|(_, k)| *k).collect();
    prop_assert_eq!(distinct.len(), occupied.len(), "duplicate key in slot array");

    for (at, key) in occupied {
        let mut reached = false;
        for i in ProbeSeq::new(t.hasher(), key, slots.len()) {
            if i == at {
                reached = true;
                break;
            }
            prop_assert!(
                !matches!(slots[i], Slot::Empty),
                "empty slot {} precedes {:?} at {}",
                i,
                key,
                at
            );
        }
        prop_assert!(reached, "key {:?} at {} unreachable by its walk", key, at);
    }
    Ok(())
}

fn run_scenario<H>(
    mut sut: HashyStepTable<String, i32, H>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: StepHasher<String> + StepHasher<str>,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut last_capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = pool[i].clone();
                let prev = sut.set(k.clone(), v);
                prop_assert_eq!(prev, Ok(model.insert(k, v)));
            }
            OpI::Get(i) => {
                let k = pool[i].as_str();
                match model.get(k) {
                    Some(v) => prop_assert_eq!(sut.get(k), Ok(v)),
                    None => prop_assert_eq!(sut.get(k), Err(TableError::NotFound)),
                }
            }
            OpI::GetMut(i, d) => {
                let k = pool[i].as_str();
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Ok(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (Err(TableError::NotFound), None) => {}
                    (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                }
            }
            OpI::Delete(i) => {
                let k = pool[i].as_str();
                match model.remove(k) {
                    Some(v) => prop_assert_eq!(sut.delete(k), Ok(v)),
                    None => prop_assert_eq!(sut.delete(k), Err(TableError::NotFound)),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains_key(&s));
            }
            OpI::Enumerate => {
                let s_keys: BTreeSet<String> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                let mut s_vals: Vec<i32> = sut.values().copied().collect();
                let mut m_vals: Vec<i32> = model.values().copied().collect();
                s_vals.sort_unstable();
                m_vals.sort_unstable();
                prop_assert_eq!(s_vals, m_vals);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= last_capacity, "capacity shrank");
        prop_assert!(3 * sut.len() <= 2 * sut.capacity(), "load factor left unchecked");
        last_capacity = sut.capacity();
        check_structure(&sut)?;
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - `set` returns the replaced value exactly when the model had one.
// - `get`/`get_mut`/`delete`/`contains` agree with the model, including
//   after lookups have compacted entries into tombstones.
// - `keys`/`values` enumerate exactly the live entries.
// - Capacity never shrinks and growth keeps the load factor bounded.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(HashyStepTable::new(), pool, ops)?;
    }
}

// Every key lands on slot 0 and walks with stride 1: the worst case for
// tombstone reuse and compaction.
#[derive(Clone, Default)]
struct Collide;

impl StepHasher<str> for Collide {
    fn primary(&self, _key: &str, _capacity: usize) -> usize {
        0
    }
    fn step(&self, _key: &str, _capacity: usize) -> usize {
        1
    }
}

impl StepHasher<String> for Collide {
    fn primary(&self, key: &String, capacity: usize) -> usize {
        <Self as StepHasher<str>>::primary(self, key, capacity)
    }
    fn step(&self, key: &String, capacity: usize) -> usize {
        <Self as StepHasher<str>>::step(self, key, capacity)
    }
}

// Property: same state-machine invariants under a fully colliding hasher.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(HashyStepTable::with_hasher(Collide), pool, ops)?;
    }
}

// Property: on a single-entry ladder the table never grows, fills every
// slot, and then rejects every `set` with `Full` without changing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_frozen_ladder_fills_exactly(keys in proptest::collection::btree_set("[a-z]{1,6}", 14..40)) {
        let ladder = CapacityLadder::new(vec![13]).expect("valid ladder");
        let mut sut: HashyStepTable<String, usize> = HashyStepTable::with_ladder(ladder);
        for (n, k) in keys.into_iter().enumerate() {
            let res = sut.set(k, n);
            if n < 13 {
                prop_assert_eq!(res, Ok(None));
            } else {
                prop_assert_eq!(res, Err(TableError::Full));
                prop_assert_eq!(sut.len(), 13);
            }
            prop_assert_eq!(sut.capacity(), 13);
            check_structure(&sut)?;
        }
        prop_assert!(sut.is_full());
    }
}
