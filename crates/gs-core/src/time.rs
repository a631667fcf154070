//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter of *completed* model
//! advances.  Wall-clock pacing (the global base period and each
//! simulation's tick rate in milliseconds) lives entirely in the scheduler
//! layer; the counter itself is exact integer arithmetic with no drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at one tick per millisecond a `u64` lasts ~585 million
/// years, so overflow is not a practical concern.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
