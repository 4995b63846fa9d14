//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! Seats are relative to the local client: `Me` is always the player at
//! this keyboard, `Opponent` is the peer or the AI. The peer's own session
//! sees the same match with the seats swapped.
//!
//! ## SeatMap
//!
//! Two-entry storage indexed by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats in a session, relative to the local client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Me,
    Opponent,
}

impl Seat {
    /// The other seat.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Seat::Me => Seat::Opponent,
            Seat::Opponent => Seat::Me,
        }
    }

    /// Both seats, local first.
    pub fn all() -> impl Iterator<Item = Seat> {
        [Seat::Me, Seat::Opponent].into_iter()
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::Me => write!(f, "me"),
            Seat::Opponent => write!(f, "opponent"),
        }
    }
}

/// Per-seat data storage.
///
/// ## Example
///
/// ```
/// use yacht_duel::core::{Seat, SeatMap};
///
/// let mut totals: SeatMap<u32> = SeatMap::with_value(0);
/// totals[Seat::Opponent] = 150;
/// assert_eq!(totals[Seat::Me], 0);
/// assert_eq!(totals[Seat::Opponent], 150);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    me: T,
    opponent: T,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            me: factory(Seat::Me),
            opponent: factory(Seat::Opponent),
        }
    }

    /// Create a new SeatMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            me: value.clone(),
            opponent: value,
        }
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        match seat {
            Seat::Me => &self.me,
            Seat::Opponent => &self.opponent,
        }
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        match seat {
            Seat::Me => &mut self.me,
            Seat::Opponent => &mut self.opponent,
        }
    }

    /// Iterate over (Seat, &T) pairs, local first.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        [(Seat::Me, &self.me), (Seat::Opponent, &self.opponent)].into_iter()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
