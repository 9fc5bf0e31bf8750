//! Hash engine: the two rolling polynomial hashes behind the probe walk.
//!
//! Both functions fold the key's characters left to right with a
//! multiplier that itself evolves per character (`a = a * 31 mod (m - 1)`,
//! seeded with 31415). `primary` reduces modulo the capacity `m` and picks
//! the home slot. `step` reduces modulo `m - 1` and adds one, so the stride
//! lands in `[1, m - 1]`. With a prime `m` every such stride is coprime to
//! `m` and a walk visits all slots before repeating.

/// Starting multiplier of both rolling hashes.
const SEED_MULTIPLIER: u64 = 31415;
/// Factor applied to the multiplier after each character.
const HASH_BASE: u64 = 31;

/// Capacity-dependent hash pair used to place a key of type `Q`.
///
/// Implementations must be deterministic for a given `(key, capacity)` and
/// must return `primary < capacity` and `1 <= step < capacity` for every
/// `capacity >= 2`.
pub trait StepHasher<Q: ?Sized> {
    /// Home slot of `key` in a table of `capacity` slots.
    fn primary(&self, key: &Q, capacity: usize) -> usize;

    /// Stride between successive probes of `key`.
    fn step(&self, key: &Q, capacity: usize) -> usize;
}

/// Default hasher for string-like keys.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PolynomialHasher;

impl PolynomialHasher {
    /// Fold `key` with the evolving multiplier, reducing the accumulator
    /// modulo `modulus` and the multiplier modulo `capacity - 1`.
    fn fold(key: &str, modulus: u64, capacity: u64) -> u64 {
        let multiplier_modulus = (capacity - 1) as u128;
        let modulus = modulus as u128;
        let mut value: u128 = 0;
        let mut a: u128 = SEED_MULTIPLIER as u128;
        for c in key.chars() {
            value = (u32::from(c) as u128 + a * value) % modulus;
            a = a * HASH_BASE as u128 % multiplier_modulus;
        }
        value as u64
    }
}

impl<Q> StepHasher<Q> for PolynomialHasher
where
    Q: AsRef<str> + ?Sized,
{
    #[inline]
    fn primary(&self, key: &Q, capacity: usize) -> usize {
        debug_assert!(capacity >= 2);
        let m = capacity as u64;
        Self::fold(key.as_ref(), m, m) as usize
    }

    #[inline]
    fn step(&self, key: &Q, capacity: usize) -> usize {
        debug_assert!(capacity >= 2);
        let m = capacity as u64;
        Self::fold(key.as_ref(), m - 1, m) as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary(key: &str, m: usize) -> usize {
        PolynomialHasher.primary(key, m)
    }

    fn step(key: &str, m: usize) -> usize {
        PolynomialHasher.step(key, m)
    }

    /// Invariant: the empty key hashes to slot 0 with stride 1.
    #[test]
    fn empty_key() {
        assert_eq!(primary("", 13), 0);
        assert_eq!(step("", 13), 1);
    }

    /// Invariant: hand-computed values for short keys at capacity 5.
    #[test]
    fn known_values_capacity_five() {
        // "a": value = 97 % 5 = 2; step: 97 % 4 = 1, +1.
        assert_eq!(primary("a", 5), 2);
        assert_eq!(step("a", 5), 2);
        // "ab": a' = 31415 * 31 % 4 = 1; value = (98 + 1 * 2) % 5 = 0.
        assert_eq!(primary("ab", 5), 0);
        // step: (98 + 1 * 1) % 4 = 3, +1.
        assert_eq!(step("ab", 5), 4);
        // "b" and "g" share home slot 3 but differ in stride.
        assert_eq!(primary("b", 5), 3);
        assert_eq!(primary("g", 5), 3);
        assert_eq!(step("b", 5), 3);
        assert_eq!(step("g", 5), 4);
    }

    /// Invariant: results stay in range for every ladder capacity.
    #[test]
    fn results_in_range() {
        let long = "x".repeat(300);
        let keys = ["", "a", "zebra", "Goalkeeper", "päivää", "🦀🦀🦀", long.as_str()];
        for &m in crate::capacity::DEFAULT_LADDER {
            for k in keys {
                assert!(primary(k, m) < m);
                let s = step(k, m);
                assert!((1..m).contains(&s), "step {s} out of range for m={m}");
            }
        }
    }

    /// Invariant: capacity 2 is accepted; the stride is always 1.
    #[test]
    fn smallest_capacity() {
        for k in ["a", "bc", "def"] {
            assert!(primary(k, 2) < 2);
            assert_eq!(step(k, 2), 1);
        }
    }

    /// Invariant: borrowed and owned string keys hash identically.
    #[test]
    fn owned_and_borrowed_agree() {
        let owned = String::from("midfielder");
        assert_eq!(
            PolynomialHasher.primary(&owned, 97),
            PolynomialHasher.primary("midfielder", 97)
        );
        assert_eq!(
            PolynomialHasher.step(&owned, 97),
            PolynomialHasher.step("midfielder", 97)
        );
    }
}
