//! Probe walk: turns a key into the one slot index an operation acts on.
//!
//! A walk starts at the key's home slot (`StepHasher::primary`) and advances
//! by the key's own stride (`StepHasher::step`). The stride is computed at
//! most once per walk, and only when the walk moves past its first slot.
//! Capacities are prime and strides lie in `[1, capacity - 1]`, so the
//! first `capacity` positions of a walk are pairwise distinct; walks are
//! cut off after that many positions.

use crate::error::{Result, TableError};
use crate::hash_engine::StepHasher;
use crate::slot::{Slot, Visit};
use core::borrow::Borrow;

/// Positions visited for one key at one capacity.
pub(crate) struct ProbeSeq<'a, Q: ?Sized, H> {
    hasher: &'a H,
    key: &'a Q,
    capacity: usize,
    position: usize,
    step: Option<usize>,
    remaining: usize,
}

impl<'a, Q, H> ProbeSeq<'a, Q, H>
where
    Q: ?Sized,
    H: StepHasher<Q>,
{
    pub(crate) fn new(hasher: &'a H, key: &'a Q, capacity: usize) -> Self {
        Self {
            hasher,
            key,
            capacity,
            position: hasher.primary(key, capacity),
            step: None,
            remaining: capacity,
        }
    }
}

impl<'a, Q, H> Iterator for ProbeSeq<'a, Q, H>
where
    Q: ?Sized,
    H: StepHasher<Q>,
{
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        if self.remaining < self.capacity {
            let step = match self.step {
                Some(step) => step,
                None => *self
                    .step
                    .insert(self.hasher.step(self.key, self.capacity)),
            };
            self.position = (self.position + step) % self.capacity;
        }
        self.remaining -= 1;
        Some(self.position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ProbeIntent {
    Lookup,
    Insert,
}

/// Where an operation should act.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ProbeOutcome {
    /// The key is live at this index.
    Found(usize),
    /// The key is absent; this empty or tombstoned index receives it.
    Vacant(usize),
}

/// Resolve `key` against `slots`.
///
/// Lookup intent: returns `Found` or fails with `NotFound` once the walk
/// reaches an empty slot or is exhausted. Insert intent: fails with `Full`
/// when every slot is live; otherwise returns `Found` for a live key or
/// `Vacant` at the first tombstone seen, else at the empty slot that ended
/// the walk.
///
/// When the key is found after the walk passed a tombstone, the entry is
/// swapped into the first such tombstone and that index is returned.
/// Later tombstones on the same walk are left alone.
pub(crate) fn probe<K, V, Q, H>(
    slots: &mut [Slot<K, V>],
    live: usize,
    hasher: &H,
    key: &Q,
    intent: ProbeIntent,
) -> Result<ProbeOutcome>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
    H: StepHasher<Q>,
{
    let capacity = slots.len();
    if intent == ProbeIntent::Insert && live == capacity {
        return Err(TableError::Full);
    }

    let mut first_tombstone: Option<usize> = None;
    for position in ProbeSeq::new(hasher, key, capacity) {
        match slots[position].visit(key) {
            Visit::Empty => {
                return match intent {
                    ProbeIntent::Insert => {
                        Ok(ProbeOutcome::Vacant(first_tombstone.unwrap_or(position)))
                    }
                    ProbeIntent::Lookup => Err(TableError::NotFound),
                };
            }
            Visit::Tombstone => {
                first_tombstone.get_or_insert(position);
            }
            Visit::Match => {
                if let Some(tombstone) = first_tombstone {
                    slots.swap(tombstone, position);
                    tracing::trace!(from = position, to = tombstone, "compacted probe chain");
                    return Ok(ProbeOutcome::Found(tombstone));
                }
                return Ok(ProbeOutcome::Found(position));
            }
            Visit::Other => {}
        }
    }

    // The walk covered every slot without meeting an empty one.
    match (intent, first_tombstone) {
        (ProbeIntent::Insert, Some(tombstone)) => Ok(ProbeOutcome::Vacant(tombstone)),
        (ProbeIntent::Insert, None) => Err(TableError::Full),
        (ProbeIntent::Lookup, _) => Err(TableError::NotFound),
    }
}
