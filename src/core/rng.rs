//! Deterministic random number generation for deck shuffling.
//!
//! The reference dealer deals from a sorted deck; `GameRng` exists for
//! games that want a shuffled deck while staying reproducible: the same
//! seed always produces the same shuffle.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG. Same seed, same sequence.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.gen_range(0..1000), rng2.gen_range(0..1000));
        }
    }

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut rng = GameRng::new(7);
        let mut data: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut data);
        assert_ne!(data, (0..50).collect::<Vec<_>>());
        data.sort_unstable();
        assert_eq!(data, (0..50).collect::<Vec<_>>());
    }
}
