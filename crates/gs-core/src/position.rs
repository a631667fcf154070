//! Integer grid coordinates.
//!
//! # Design
//!
//! A `Position` is a plain `(x, y)` integer pair.  Coordinates are signed so
//! neighborhood arithmetic near the origin (`center.x - r`) never underflows;
//! bounds checking against a grid's `[0, width) × [0, height)` box happens in
//! `gs-grid`, not here.
//!
//! The `Ord` impl is **row-major** (`y` first, then `x`).  Sorting a set of
//! positions therefore yields the canonical visitation order used by the
//! model tick loop, where determinism depends on a fixed order.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A cell coordinate on a 2-D grid.  Freely copied; equality and hash are
/// by value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (chessboard) distance to `other`: `max(|dx|, |dy|)`.
    ///
    /// This is the metric used by all radius queries in `gs-grid` — the set
    /// of positions within distance `r` is exactly the (2r+1)² square
    /// centered on `self`.
    #[inline]
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

/// Component-wise difference: `a - b = (a.x - b.x, a.y - b.y)`.
impl Sub for Position {
    type Output = Position;

    #[inline]
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Row-major ordering: compare `y` first, then `x`.
impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}
