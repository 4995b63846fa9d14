//! Scorecard: category scores, upper bonus, totals.
//!
//! Entries are write-once. The upper bonus is derived on read and never
//! stored.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::category::{Category, CATEGORY_COUNT};
use super::error::{GameError, Result};

/// Upper-section sum needed for the bonus.
pub const UPPER_BONUS_THRESHOLD: u32 = 63;

/// Bonus awarded once the upper section reaches the threshold.
pub const UPPER_BONUS: u32 = 35;

/// One player's scorecard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    entries: FxHashMap<Category, u32>,
}

impl Scorecard {
    /// Create an empty scorecard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the score of a category, or `None` if it is still open.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<u32> {
        self.entries.get(&category).copied()
    }

    /// Check if a category has been scored.
    #[must_use]
    pub fn is_scored(&self, category: Category) -> bool {
        self.entries.contains_key(&category)
    }

    /// Record a score. Fails if the category already holds one.
    pub fn record(&mut self, category: Category, score: u32) -> Result<()> {
        if self.is_scored(category) {
            return Err(GameError::AlreadyScored(category));
        }
        self.entries.insert(category, score);
        Ok(())
    }

    /// Open categories in scorecard order.
    pub fn open_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|&c| !self.is_scored(c))
    }

    /// Number of scored categories.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.entries.len()
    }

    /// Check if all twelve categories are scored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.len() == CATEGORY_COUNT
    }

    /// Sum of the scored upper-section categories.
    #[must_use]
    pub fn upper_sum(&self) -> u32 {
        Category::UPPER.iter().filter_map(|&c| self.get(c)).sum()
    }

    /// The upper bonus: exactly 35 or 0.
    #[must_use]
    pub fn upper_bonus(&self) -> u32 {
        if self.upper_sum() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    /// Sum of the scored lower-section categories.
    #[must_use]
    pub fn lower_sum(&self) -> u32 {
        self.entries
            .iter()
            .filter(|(c, _)| !c.is_upper())
            .map(|(_, &s)| s)
            .sum()
    }

    /// Grand total including the upper bonus.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.upper_sum() + self.upper_bonus() + self.lower_sum()
    }
}
