//! Injected randomness.
//!
//! Shuffles, room codes, and word selection all draw from a [`RandomSource`]
//! passed in at service construction, so tests can supply a seeded source
//! and assert exact outcomes. The trait stays object-safe because rulesets
//! receive it as `&mut dyn RandomSource`.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Source of uniform random indices.
pub trait RandomSource: Send {
    /// Returns a uniform value in `[0, upper)`. `upper` must be nonzero.
    fn next_below(&mut self, upper: usize) -> usize;
}

/// Fisher-Yates shuffle of `items` in place.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i + 1);
        items.swap(i, j);
    }
}

/// Picks one element of `items` uniformly.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[rng.next_below(items.len())]
}

/// OS-seeded source for production use.
#[derive(Debug)]
pub struct ThreadRandom(StdRng);

impl ThreadRandom {
    /// Creates a source seeded from the operating system.
    pub fn new() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_below(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }
}

/// Deterministic source for tests.
#[derive(Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    /// Creates a source from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, upper: usize) -> usize {
        (self.0.next_u64() % upper as u64) as usize
    }
}
