//! The twelve scorecard categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of scorecard categories.
pub const CATEGORY_COUNT: usize = 12;

/// A scorecard category.
///
/// The declaration order is the fixed scorecard order: the six upper-section
/// faces, then the lower-section combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Aces,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yacht,
    Chance,
}

impl Category {
    /// Every category in scorecard order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Aces,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yacht,
        Category::Chance,
    ];

    /// The upper-section categories, aces through sixes.
    pub const UPPER: [Category; 6] = [
        Category::Aces,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    /// Position in scorecard order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Check if this category belongs to the upper section.
    #[must_use]
    pub const fn is_upper(self) -> bool {
        self.index() < 6
    }

    /// The face an upper-section category counts, or `None` for lower ones.
    #[must_use]
    pub const fn upper_face(self) -> Option<u8> {
        if self.is_upper() {
            Some(self.index() as u8 + 1)
        } else {
            None
        }
    }

    /// Wire and display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::Aces => "aces",
            Category::Twos => "twos",
            Category::Threes => "threes",
            Category::Fours => "fours",
            Category::Fives => "fives",
            Category::Sixes => "sixes",
            Category::FourOfAKind => "four_of_a_kind",
            Category::FullHouse => "full_house",
            Category::SmallStraight => "small_straight",
            Category::LargeStraight => "large_straight",
            Category::Yacht => "yacht",
            Category::Chance => "chance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unrecognised category name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
