//! Capacity ladder: the fixed, ascending list of prime table sizes a table
//! grows through.

use std::sync::Arc;
use thiserror::Error;

/// Built-in ladder. Each step roughly doubles the previous capacity and
/// the last entry comfortably holds a million live entries.
pub const DEFAULT_LADDER: &[usize] = &[
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

/// Reasons a ladder is rejected at construction.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum LadderError {
    #[error("capacity ladder is empty")]
    Empty,
    #[error("ladder entry {index} ({capacity}) is not prime")]
    NotPrime { index: usize, capacity: usize },
    #[error("ladder entry {index} ({capacity}) is smaller than its predecessor ({previous})")]
    Decreasing {
        index: usize,
        capacity: usize,
        previous: usize,
    },
}

/// Validated, immutable sequence of capacities.
///
/// Cloning shares the underlying storage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapacityLadder {
    sizes: Arc<[usize]>,
}

impl CapacityLadder {
    /// Validate `sizes`: non-empty, every entry prime, never decreasing.
    ///
    /// Repeated entries are accepted; a ladder such as `[5, 5]` grows once
    /// without changing size and then freezes.
    pub fn new(sizes: Vec<usize>) -> Result<Self, LadderError> {
        if sizes.is_empty() {
            return Err(LadderError::Empty);
        }
        for (index, &capacity) in sizes.iter().enumerate() {
            if !is_prime(capacity) {
                return Err(LadderError::NotPrime { index, capacity });
            }
            if index > 0 && capacity < sizes[index - 1] {
                return Err(LadderError::Decreasing {
                    index,
                    capacity,
                    previous: sizes[index - 1],
                });
            }
        }
        Ok(Self {
            sizes: sizes.into(),
        })
    }

    /// Sub-ladder beginning at the first capacity strictly greater than
    /// `population`, or at the last capacity when none is.
    ///
    /// A table built on the result starts large enough to hold `population`
    /// entries without probing into a full array.
    pub fn starting_above(&self, population: usize) -> Self {
        let start = self
            .sizes
            .iter()
            .position(|&c| c > population)
            .unwrap_or(self.sizes.len() - 1);
        Self {
            sizes: self.sizes[start..].into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false; kept for symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Capacity at ladder position `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    #[inline]
    pub fn first(&self) -> usize {
        self.sizes[0]
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }
}

impl Default for CapacityLadder {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_LADDER.into(),
        }
    }
}

impl TryFrom<Vec<usize>> for CapacityLadder {
    type Error = LadderError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl TryFrom<&[usize]> for CapacityLadder {
    type Error = LadderError;

    fn try_from(sizes: &[usize]) -> Result<Self, Self::Error> {
        Self::new(sizes.to_vec())
    }
}

/// Trial division; ladder entries are small enough for this to be instant.
fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5usize;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}
