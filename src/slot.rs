//! Slot: the three states of one cell of the table's array.

use core::borrow::Borrow;

#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    /// Never written since the array was allocated.
    Empty,
    /// Held an entry that was deleted. Lookups walk past it, inserts may
    /// reuse it.
    Tombstone,
    Occupied(K, V),
}

/// What a probe sees when it lands on a slot, relative to the key it is
/// looking for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Visit {
    Empty,
    Tombstone,
    Match,
    Other,
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn visit<Q>(&self, key: &Q) -> Visit
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        match self {
            Slot::Empty => Visit::Empty,
            Slot::Tombstone => Visit::Tombstone,
            Slot::Occupied(k, _) if k.borrow() == key => Visit::Match,
            Slot::Occupied(..) => Visit::Other,
        }
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    /// Allocate `capacity` empty slots.
    pub(crate) fn array(capacity: usize) -> Box<[Slot<K, V>]> {
        (0..capacity).map(|_| Slot::Empty).collect()
    }
}
