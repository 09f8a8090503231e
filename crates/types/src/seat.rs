//! Logical negotiating seats.
//!
//! A seat is stable across repeated runs of the same matchup; raw actor ids are
//! not. Everything downstream of seat resolution is keyed by [`Seat`] and stored
//! in the fixed-shape [`PerSeat`] container instead of maps keyed by actor id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two logical roles in a bilateral negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    /// Both seats in canonical order.
    pub const ALL: [Seat; 2] = [Seat::A, Seat::B];

    pub fn opponent(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    /// Stable role label used in campaign-level tables.
    pub fn role_label(self) -> &'static str {
        match self {
            Seat::A => "Agent_A",
            Seat::B => "Agent_B",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::A => f.write_str("A"),
            Seat::B => f.write_str("B"),
        }
    }
}

/// Exactly one value per seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSeat<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerSeat<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Build both entries from a function of the seat.
    pub fn from_fn(mut f: impl FnMut(Seat) -> T) -> Self {
        Self {
            a: f(Seat::A),
            b: f(Seat::B),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Seat, T) -> U) -> PerSeat<U> {
        PerSeat {
            a: f(Seat::A, self.a),
            b: f(Seat::B, self.b),
        }
    }

    /// The same values with the seats exchanged.
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Iterate `(seat, value)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        [(Seat::A, &self.a), (Seat::B, &self.b)].into_iter()
    }
}

impl<T> Index<Seat> for PerSeat<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &T {
        match seat {
            Seat::A => &self.a,
            Seat::B => &self.b,
        }
    }
}

impl<T> IndexMut<Seat> for PerSeat<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut T {
        match seat {
            Seat::A => &mut self.a,
            Seat::B => &mut self.b,
        }
    }
}
