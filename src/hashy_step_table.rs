//! HashyStepTable: the public map built from the probe walk, the slot array
//! and the capacity ladder.

use crate::capacity::CapacityLadder;
use crate::error::{Result, TableError};
use crate::hash_engine::{PolynomialHasher, StepHasher};
use crate::probe::{probe, ProbeIntent, ProbeOutcome, ProbeSeq};
use crate::slot::Slot;
use core::borrow::Borrow;
use core::fmt;

/// Open-addressing map with per-key probe strides.
///
/// Lookups take `&mut self`: a successful lookup may move the entry into an
/// earlier tombstone on its probe walk. Iteration order is array order and
/// changes whenever the table grows.
#[derive(Clone)]
pub struct HashyStepTable<K, V, H = PolynomialHasher> {
    hasher: H,
    ladder: CapacityLadder,
    ladder_index: usize,
    slots: Box<[Slot<K, V>]>,
    live: usize,
    // Set once growth was refused at the end of the ladder.
    frozen: bool,
}

impl<K, V> HashyStepTable<K, V> {
    /// Empty table on the default ladder, starting at 5 slots.
    pub fn new() -> Self {
        Self::with_ladder_and_hasher(CapacityLadder::default(), PolynomialHasher)
    }

    pub fn with_ladder(ladder: CapacityLadder) -> Self {
        Self::with_ladder_and_hasher(ladder, PolynomialHasher)
    }
}

impl<K, V> Default for HashyStepTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> HashyStepTable<K, V, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_ladder_and_hasher(CapacityLadder::default(), hasher)
    }

    pub fn with_ladder_and_hasher(ladder: CapacityLadder, hasher: H) -> Self {
        let slots = Slot::array(ladder.first());
        Self {
            hasher,
            ladder,
            ladder_index: 0,
            slots,
            live: 0,
            frozen: false,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// True when every slot holds a live entry. Only reachable once the
    /// ladder is exhausted; `set` then fails with `TableError::Full`.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }

    /// Current number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn ladder(&self) -> &CapacityLadder {
        &self.ladder
    }

    /// Position of the current capacity in the ladder.
    pub fn ladder_index(&self) -> usize {
        self.ladder_index
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    #[cfg(test)]
    pub(crate) fn slots_for_test(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    // Growth threshold: live > 2/3 of capacity.
    #[inline]
    fn over_load_factor(&self) -> bool {
        3 * self.live > 2 * self.slots.len()
    }
}

impl<K, V, H> HashyStepTable<K, V, H>
where
    K: Eq,
    H: StepHasher<K>,
{
    /// Bind `key` to `value`, returning the value it replaces.
    ///
    /// Grows the table to the next ladder capacity when the write pushes the
    /// load factor over two thirds. Fails with `TableError::Full`, leaving the
    /// table untouched, when every slot is already live.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        let outcome = probe(&mut self.slots, self.live, &self.hasher, &key, ProbeIntent::Insert)?;
        let previous = match outcome {
            ProbeOutcome::Found(i) => {
                match core::mem::replace(&mut self.slots[i], Slot::Occupied(key, value)) {
                    Slot::Occupied(_, old) => Some(old),
                    _ => unreachable!("probe reported a live entry at {i}"),
                }
            }
            ProbeOutcome::Vacant(i) => {
                self.slots[i] = Slot::Occupied(key, value);
                self.live += 1;
                None
            }
        };
        if self.over_load_factor() {
            self.grow();
        }
        Ok(previous)
    }

    /// Move every live entry into a fresh array at the next ladder capacity,
    /// dropping tombstones. At the end of the ladder this does nothing.
    fn grow(&mut self) {
        let Some(capacity) = self.ladder.get(self.ladder_index + 1) else {
            if !self.frozen {
                self.frozen = true;
                tracing::debug!(
                    capacity = self.slots.len(),
                    live = self.live,
                    "capacity ladder exhausted; table will not grow further"
                );
            }
            return;
        };

        let old = core::mem::replace(&mut self.slots, Slot::array(capacity));
        let from = old.len();
        self.ladder_index += 1;
        self.live = 0;
        for slot in old.into_vec() {
            if let Slot::Occupied(key, value) = slot {
                self.place(key, value);
            }
        }
        tracing::debug!(from, to = capacity, live = self.live, "rehashed table");
    }

    /// Insert into an array with no tombstones and no copy of `key`.
    fn place(&mut self, key: K, value: V) {
        let capacity = self.slots.len();
        let slot = ProbeSeq::new(&self.hasher, &key, capacity)
            .find(|&i| matches!(self.slots[i], Slot::Empty));
        match slot {
            Some(i) => {
                self.slots[i] = Slot::Occupied(key, value);
                self.live += 1;
            }
            // Capacities never shrink, so the new array always has room.
            None => unreachable!("no empty slot while rehashing into {capacity} slots"),
        }
    }

    /// Value bound to `key`.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: StepHasher<Q>,
    {
        let i = self.find(key)?;
        self.slots[i].entry().map(|(_, v)| v).ok_or(TableError::NotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: StepHasher<Q>,
    {
        let i = self.find(key)?;
        self.slots[i].value_mut().ok_or(TableError::NotFound)
    }

    pub fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: StepHasher<Q>,
    {
        self.get(key).is_ok()
    }

    /// Remove `key`, leaving a tombstone in its slot, and return its value.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: StepHasher<Q>,
    {
        let i = self.find(key)?;
        match core::mem::replace(&mut self.slots[i], Slot::Tombstone) {
            Slot::Occupied(_, value) => {
                self.live -= 1;
                Ok(value)
            }
            _ => unreachable!("probe reported a live entry at {i}"),
        }
    }

    fn find<Q>(&mut self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: StepHasher<Q>,
    {
        match probe(&mut self.slots, self.live, &self.hasher, key, ProbeIntent::Lookup)? {
            ProbeOutcome::Found(i) => Ok(i),
            ProbeOutcome::Vacant(_) => Err(TableError::NotFound),
        }
    }
}

/// Iterator over live entries in array order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.find_map(Slot::entry)
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashyStepTable<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One `(key,value)` line per live entry, in array order.
impl<K, V, H> fmt::Display for HashyStepTable<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.iter() {
            writeln!(f, "({},{})", k, v)?;
        }
        Ok(())
    }
}

impl<K, V, H> fmt::Debug for HashyStepTable<K, V, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ladder(sizes: &[usize]) -> CapacityLadder {
        CapacityLadder::try_from(sizes).expect("valid ladder")
    }

    /// Invariant: `set` then `get` returns the stored value; absent keys
    /// report `NotFound`.
    #[test]
    fn set_get_roundtrip() {
        let mut t: HashyStepTable<String, i32> = HashyStepTable::new();
        assert_eq!(t.set("a".to_string(), 1), Ok(None));
        assert_eq!(t.set("b".to_string(), 2), Ok(None));
        assert_eq!(t.get("a"), Ok(&1));
        assert_eq!(t.get("b"), Ok(&2));
        assert_eq!(t.get("c"), Err(TableError::NotFound));
        assert_eq!(t.len(), 2);
    }

    /// Invariant: re-setting a key replaces its value without changing `len`.
    #[test]
    fn update_replaces_in_place() {
        let mut t: HashyStepTable<String, i32> = HashyStepTable::new();
        t.set("k".to_string(), 1).unwrap();
        assert_eq!(t.set("k".to_string(), 2), Ok(Some(1)));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("k"), Ok(&2));
    }

    /// Invariant: delete leaves a tombstone, returns the value, and the key
    /// is then absent; a second delete reports `NotFound`.
    #[test]
    fn delete_then_absent() {
        let mut t: HashyStepTable<String, i32> = HashyStepTable::new();
        t.set("k".to_string(), 7).unwrap();
        assert_eq!(t.delete("k"), Ok(7));
        assert!(!t.contains("k"));
        assert_eq!(t.get("k"), Err(TableError::NotFound));
        assert_eq!(t.delete("k"), Err(TableError::NotFound));
        assert!(t.is_empty());
        assert!(t.slots.iter().any(|s| matches!(s, Slot::Tombstone)));
    }

    /// Invariant: a tombstone is reused by the next insert and counted as a
    /// fresh entry.
    #[test]
    fn tombstone_slot_is_reused() {
        let mut t: HashyStepTable<&'static str, i32> = HashyStepTable::new();
        t.set("a", 1).unwrap();
        let home = PolynomialHasher.primary("a", 5);
        t.delete("a").unwrap();
        assert!(matches!(t.slots[home], Slot::Tombstone));
        t.set("a", 2).unwrap();
        assert!(matches!(t.slots[home], Slot::Occupied("a", 2)));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: crossing two thirds of capacity moves to the next ladder
    /// capacity and keeps every entry.
    #[test]
    fn growth_at_two_thirds() {
        let mut t: HashyStepTable<String, usize> = HashyStepTable::new();
        for i in 0..3 {
            t.set(format!("k{i}"), i).unwrap();
        }
        // 3 * 3 = 9 <= 10: still at the first capacity.
        assert_eq!(t.capacity(), 5);
        t.set("k3".to_string(), 3).unwrap();
        assert_eq!(t.capacity(), 13);
        assert_eq!(t.ladder_index(), 1);
        for i in 0..4 {
            assert_eq!(t.get(format!("k{i}").as_str()), Ok(&i));
        }
    }

    /// Invariant: growth discards tombstones.
    #[test]
    fn growth_drops_tombstones() {
        let mut t: HashyStepTable<String, usize> = HashyStepTable::new();
        for i in 0..3 {
            t.set(format!("k{i}"), i).unwrap();
        }
        t.delete("k0").unwrap();
        t.set("k3".to_string(), 3).unwrap();
        t.set("k4".to_string(), 4).unwrap();
        assert_eq!(t.capacity(), 13);
        assert!(t.slots.iter().all(|s| !matches!(s, Slot::Tombstone)));
        assert_eq!(t.len(), 4);
    }

    /// Invariant: at the end of the ladder growth is silently skipped and the
    /// table fills every slot before refusing inserts.
    #[test]
    fn exhausted_ladder_fills_then_full() {
        let mut t: HashyStepTable<String, usize> = HashyStepTable::with_ladder(ladder(&[5]));
        for i in 0..5 {
            t.set(format!("k{i}"), i).unwrap();
        }
        assert!(t.is_full());
        assert_eq!(t.capacity(), 5);
        assert_eq!(t.set("k5".to_string(), 5), Err(TableError::Full));
        // Updates are refused as well while every slot is live.
        assert_eq!(t.set("k0".to_string(), 9), Err(TableError::Full));
        assert_eq!(t.get("k0"), Ok(&0));
        assert_eq!(t.get("nope"), Err(TableError::NotFound));

        // Deleting makes room again.
        t.delete("k2").unwrap();
        assert_eq!(t.set("k5".to_string(), 5), Ok(None));
        assert_eq!(t.get("k5"), Ok(&5));
    }

    /// Invariant: `get_mut` edits the stored value in place.
    #[test]
    fn get_mut_updates_value() {
        let mut t: HashyStepTable<String, Vec<u32>> = HashyStepTable::new();
        t.set("goals".to_string(), Vec::new()).unwrap();
        t.get_mut("goals").unwrap().push(3);
        t.get_mut("goals").unwrap().push(1);
        assert_eq!(t.get("goals"), Ok(&vec![3, 1]));
        assert!(t.get_mut("assists").is_err());
    }

    /// Invariant: keys, values and iter agree and list each live entry once.
    #[test]
    fn enumeration_is_consistent() {
        let mut t: HashyStepTable<String, usize> = HashyStepTable::new();
        for i in 0..40 {
            t.set(format!("key{i}"), i).unwrap();
        }
        for i in (0..40).step_by(3) {
            t.delete(format!("key{i}").as_str()).unwrap();
        }
        let keys: Vec<&String> = t.keys().collect();
        let values: Vec<&usize> = t.values().collect();
        let pairs: Vec<(&String, &usize)> = t.iter().collect();
        assert_eq!(keys.len(), t.len());
        assert_eq!(values.len(), t.len());
        for ((k, v), (pk, pv)) in keys.iter().zip(values.iter()).zip(pairs.iter()) {
            assert_eq!(k, pk);
            assert_eq!(v, pv);
            assert_eq!(**k, format!("key{}", **v));
        }
        let distinct: BTreeSet<&String> = keys.iter().copied().collect();
        assert_eq!(distinct.len(), keys.len());
    }

    /// Invariant: Display prints one `(key,value)` line per live entry.
    #[test]
    fn display_lists_live_entries() {
        let mut t: HashyStepTable<String, i32> = HashyStepTable::new();
        t.set("a".to_string(), 1).unwrap();
        t.set("b".to_string(), 2).unwrap();
        t.delete("a").unwrap();
        assert_eq!(t.to_string(), "(b,2)\n");
        assert_eq!(format!("{:?}", t), "{\"b\": 2}");
    }

    /// Invariant: a custom hasher routes every key through its own walk; with
    /// all keys colliding the table still resolves each by equality.
    #[test]
    fn colliding_hasher_still_resolves() {
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

        let mut t: HashyStepTable<String, usize, Collide> = HashyStepTable::with_hasher(Collide);
        for i in 0..20 {
            t.set(format!("c{i}"), i).unwrap();
        }
        for i in 0..20 {
            assert_eq!(t.get(format!("c{i}").as_str()), Ok(&i));
        }
        t.delete("c0").unwrap();
        assert_eq!(t.get("c19"), Ok(&19));
        assert_eq!(t.len(), 19);
    }
}
