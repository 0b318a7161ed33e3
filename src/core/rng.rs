//! Injectable randomness source
//!
//! Every probabilistic decision in a fight (archetype selection, stat
//! generation, defense rolls, special skill gating, flavor verbs) goes
//! through one `Randomness` value owned by the fight. Seeded runs are
//! fully reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws used by the fight engine
pub trait Randomness {
    /// Uniform integer in `low..=high`
    fn range_inclusive(&mut self, low: i64, high: i64) -> i64;

    /// Uniform index in `0..len`
    fn index(&mut self, len: usize) -> usize;

    /// Percentile roll in `1..=100`
    fn percentile(&mut self) -> u32 {
        self.range_inclusive(1, 100) as u32
    }
}

/// Deterministic ChaCha8 generator that remembers its seed
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from OS entropy; the drawn seed is kept so a run can be replayed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Randomness for SeededRng {
    fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}
