//! Leveling policy
//!
//! Heights follow a geometric distribution: start at 1 and keep climbing
//! while a fair coin lands heads, so P(height >= k) = 2^-(k-1). Most entries
//! stay low, which keeps descents at O(log n) expected steps.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MAX_LEVEL_LIMIT;

/// Draws entry heights for a skip list
#[derive(Debug, Clone)]
pub struct LevelGenerator<R = StdRng> {
    max_level: usize,
    rng: R,
}

impl LevelGenerator<StdRng> {
    /// Generator seeded from OS entropy
    pub fn new(max_level: usize) -> Self {
        Self::with_rng(max_level, StdRng::from_entropy())
    }

    /// Deterministic generator, for tests and benchmarks
    pub fn seeded(max_level: usize, seed: u64) -> Self {
        Self::with_rng(max_level, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LevelGenerator<R> {
    /// Generator drawing from `rng`; `max_level` is clamped to `MAX_LEVEL_LIMIT`
    pub fn with_rng(max_level: usize, rng: R) -> Self {
        Self {
            max_level: max_level.min(MAX_LEVEL_LIMIT),
            rng,
        }
    }

    /// Ceiling on drawn heights
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Draw a height in `min(1, max_level)..=max_level`
    pub fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level.min(self.max_level)
    }
}
