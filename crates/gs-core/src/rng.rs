//! Deterministic RNG wrapper for behavior catalogs.
//!
//! # Determinism strategy
//!
//! The engine core never draws randomness itself — tick folding, radius
//! queries, and scheduling are all deterministic.  Behavior strategies,
//! however, routinely need it (Schelling relocation targets, infection
//! probabilities), so the framework offers one blessed wrapper rather than
//! letting every catalog reach for a thread-local RNG and lose
//! reproducibility.
//!
//! A `SimRng` seeded with the same `u64` always produces the same stream,
//! so a simulation built from deterministic strategies plus seeded `SimRng`s
//! replays identically.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Deterministic simulation RNG.
///
/// Intentionally `!Sync`: strategies that share one `SimRng` across agents
/// must wrap it in a `Mutex` themselves, which makes the sharing (and its
/// ordering sensitivity) visible at the call site.
pub struct SimRng(SmallRng);

impl SimRng {
    /// Seed deterministically from a run-level seed.
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream, e.g. one per agent group.
    ///
    /// `index` is mixed with the golden-ratio constant so consecutive
    /// indices land far apart in seed space.
    pub fn derive(seed: u64, index: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(
            seed ^ index.wrapping_mul(MIXING_CONSTANT),
        ))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
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

    /// Bernoulli draw: `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.0.gen_range(0.0..1.0) < p
    }

    /// Pick a uniformly random element of `items`, or `None` if empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.0.gen_range(0..items.len())])
        }
    }
}
