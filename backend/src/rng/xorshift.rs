//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG with 64-bit state. A variant of xorshift
//! that passes TestU01's BigCrush statistical tests.
//!
//! # Determinism
//!
//! Same seed, same sequence. This matters here because a RANDOM
//! rotation must be re-derivable only at generation time: given the
//! seed an operator can reproduce exactly the beneficiary order a
//! group was assigned, but the engine itself never recomputes it.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use tontine_ledger_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let index = rng.range(0, 8); // [0, 8)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed.
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random index in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: usize, max: usize) -> usize {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as usize
    }

    /// Shuffle a slice in place (Fisher–Yates).
    ///
    /// Produces a uniformly-random permutation of the slice, consuming
    /// `len - 1` draws from the generator.
    ///
    /// # Example
    /// ```
    /// use tontine_ledger_core_rs::RngManager;
    ///
    /// let mut order = vec!["alice", "bob", "carol"];
    /// RngManager::new(7).shuffle(&mut order);
    /// assert_eq!(order.len(), 3);
    /// ```
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.range(0, i + 1);
            slice.swap(i, j);
        }
    }

    /// Get current RNG state (for replay).
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();

        RngManager::new(99999).shuffle(&mut a);
        RngManager::new(99999).shuffle(&mut b);

        assert_eq!(a, b, "same seed must yield the same permutation");
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut values: Vec<u32> = (0..50).collect();
        RngManager::new(42).shuffle(&mut values);

        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_shuffle_handles_trivial_slices() {
        let mut empty: Vec<u32> = vec![];
        RngManager::new(1).shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![9];
        RngManager::new(1).shuffle(&mut single);
        assert_eq!(single, vec![9]);
    }
}
