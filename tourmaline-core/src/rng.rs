//! Deterministic randomness for height sampling and batch decisions.
//!
//! Every random decision derives from the forest seed, so two runs with the
//! same seed build identical skip-list shapes and identical batch-cut
//! recursion trees. Batch phases need order-independent draws (a Rayon
//! worker must see the same value for index `i` regardless of scheduling),
//! which the indexed splitmix64 generator provides.

use rand::{rngs::SmallRng, RngCore, SeedableRng};

use crate::list::MAX_HEIGHT;

/// SplitMix64 increment (the 64-bit golden ratio).
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(SPLITMIX_GAMMA);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// A counter-mode generator yielding an independent draw per index.
///
/// `ith(i)` is pure, so parallel loops may consume draws in any order;
/// `next()` advances the state once the batch has finished with it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Randomness {
    state: u64,
}

impl Randomness {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: splitmix64(seed),
        }
    }

    /// Returns the `i`-th draw of the current state.
    #[inline]
    pub(crate) fn ith(&self, i: usize) -> u64 {
        splitmix64(self.state ^ (i as u64).wrapping_mul(SPLITMIX_GAMMA))
    }

    /// Advances to the next batch of draws.
    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self {
            state: splitmix64(self.state),
        }
    }
}

/// Builds the height sampler used while laying out the element arena.
pub(crate) fn height_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Samples a skip-list height from geometric(½), capped at [`MAX_HEIGHT`].
pub(crate) fn sample_height(rng: &mut SmallRng) -> usize {
    let draw = rng.next_u64();
    (1 + draw.trailing_ones() as usize).min(MAX_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_draws_are_pure() {
        let randomness = Randomness::new(0x5EED);
        assert_eq!(randomness.ith(3), randomness.ith(3));
        assert_ne!(randomness.ith(3), randomness.ith(4));
    }

    #[test]
    fn next_changes_the_draw_stream() {
        let randomness = Randomness::new(0x5EED);
        assert_ne!(randomness.ith(0), randomness.next().ith(0));
    }

    #[test]
    fn heights_stay_within_bounds() {
        let mut rng = height_rng(42);
        for _ in 0..10_000 {
            let height = sample_height(&mut rng);
            assert!((1..=MAX_HEIGHT).contains(&height));
        }
    }

    #[test]
    fn heights_are_reproducible_per_seed() {
        let mut a = height_rng(7);
        let mut b = height_rng(7);
        let first: Vec<usize> = (0..64).map(|_| sample_height(&mut a)).collect();
        let second: Vec<usize> = (0..64).map(|_| sample_height(&mut b)).collect();
        assert_eq!(first, second);
    }
}
