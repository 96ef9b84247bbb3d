//! Deterministic run-level RNG.
//!
//! The only randomness in a run is where spawned agents are placed.  All of
//! it flows through one `SimRng` seeded from `SimConfig::seed`, so a given
//! seed always produces the same crowd.  Each spawn area draws a child RNG
//! with [`SimRng::child`] so adding an area does not disturb the placement
//! in the others.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG for global operations (spawn placement).
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent RNG for stream `offset` (e.g. a spawn area index).
    ///
    /// Depends only on the root seed and `offset`, never on how many values
    /// were drawn from `self` before.
    pub fn child(seed: u64, offset: u64) -> SimRng {
        SimRng(SmallRng::seed_from_u64(seed ^ (offset + 1).wrapping_mul(MIXING_CONSTANT)))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
