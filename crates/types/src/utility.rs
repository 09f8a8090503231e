//! Seat-ordered utility pairs.

use derive_more::{Add, Sub};
use serde::{Deserialize, Serialize};

use crate::seat::Seat;

/// Utility of one bid under each seat's own preference profile.
///
/// Serialized as a two-element array `[a, b]`, the layout used by domain
/// reference files.
#[derive(Debug, Clone, Copy, PartialEq, Default, Add, Sub, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct UtilityPair {
    /// Utility for seat A.
    pub a: f64,
    /// Utility for seat B.
    pub b: f64,
}

impl UtilityPair {
    /// Explicit fallback used when no agreement was reached.
    pub const ZERO: UtilityPair = UtilityPair { a: 0.0, b: 0.0 };

    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn get(self, seat: Seat) -> f64 {
        match seat {
            Seat::A => self.a,
            Seat::B => self.b,
        }
    }

    /// `(own, opponent)` utilities from the point of view of `seat`.
    pub fn oriented(self, seat: Seat) -> (f64, f64) {
        (self.get(seat), self.get(seat.opponent()))
    }

    /// The pair with the two seats' utilities exchanged.
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Euclidean distance between two utility points.
    pub fn distance(self, other: UtilityPair) -> f64 {
        (self.a - other.a).hypot(self.b - other.b)
    }
}

impl From<[f64; 2]> for UtilityPair {
    fn from([a, b]: [f64; 2]) -> Self {
        Self { a, b }
    }
}

impl From<UtilityPair> for [f64; 2] {
    fn from(pair: UtilityPair) -> Self {
        [pair.a, pair.b]
    }
}
