//! hashy-step-table: an open-addressing map whose probe stride is derived
//! from each key, with lazy deletion and growth through a fixed ladder of
//! prime capacities.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) amortized set/get/delete over one contiguous slot array,
//!   built in small layers that can each be checked on their own.
//! - Layers:
//!   - `hash_engine`: two rolling polynomial hashes over a key's
//!     characters, both parameterized by the current capacity. The first
//!     picks the home slot, the second the stride.
//!   - `probe`: the walk from the home slot by the key's stride, and the
//!     resolution of that walk into the one index an operation acts on.
//!   - `slot`: `Empty | Tombstone | Occupied(K, V)`.
//!   - `capacity`: the validated ladder of prime capacities.
//!   - `HashyStepTable<K, V, H>`: public API; owns the array, counts live
//!     entries and drives growth.
//!
//! Constraints
//! - Single owner, no locking. Lookups take `&mut self` because a hit may
//!   relocate the entry (see Compaction); embed behind one external lock if
//!   shared.
//! - Capacities come only from the ladder, which is walked forward and never
//!   shrinks. Every ladder entry is prime, so any stride in
//!   `[1, capacity - 1]` reaches every slot.
//! - Keys are unique among occupied slots.
//!
//! Deletion
//! - `delete` writes a tombstone. Lookups continue past tombstones; inserts
//!   take the first tombstone on the walk unless the key itself turns up
//!   later on the same walk.
//! - An empty slot ends every walk: insertion never skips an empty slot, so
//!   no key can live beyond one on its own walk.
//!
//! Compaction
//! - When a lookup finds its key after passing tombstones, the entry is
//!   swapped into the first tombstone seen. Later tombstones on that walk
//!   are left in place. Callers never observe slot positions.
//!
//! Growth
//! - After a write, if live entries exceed two thirds of the capacity, the
//!   table moves to the next ladder capacity: a fresh array is allocated and
//!   every live entry is placed again in old-array order; tombstones are
//!   dropped.
//! - At the last ladder entry growth is a silent no-op. The table keeps
//!   working and `set` fails with `TableError::Full` once every slot is live.
//!
//! Hashing
//! - `PolynomialHasher` handles any `AsRef<str>` key. Other key types plug in
//!   their own `StepHasher`, as long as `primary < capacity` and
//!   `1 <= step < capacity`.

pub mod capacity;
mod error;
pub mod hash_engine;
mod hashy_step_table;
mod hashy_step_table_proptest;
mod probe;
mod slot;

// Public surface
pub use capacity::{CapacityLadder, LadderError, DEFAULT_LADDER};
pub use error::{Result, TableError};
pub use hash_engine::{PolynomialHasher, StepHasher};
pub use hashy_step_table::{HashyStepTable, Iter, Keys, Values};
