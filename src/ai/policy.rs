//! Keep and score decisions.
//!
//! Policies are trait-based so the opponent's behaviour can be swapped:
//! - `keep`: which dice to hold before the next roll
//! - `choose_category`: where to write the final dice

use smallvec::SmallVec;

use crate::core::{Category, DiceSet, Scorecard, DICE_COUNT};
use crate::rules::score;

/// Indices of dice to hold back from the next roll.
pub type KeepSet = SmallVec<[usize; DICE_COUNT]>;

/// Categories worth locking the whole roll for as soon as they appear.
const LOCK_IN: [Category; 3] = [Category::Yacht, Category::LargeStraight, Category::FullHouse];

/// Open upper categories to sacrifice, cheapest first, when nothing scores.
const SACRIFICE: [Category; 3] = [Category::Aces, Category::Twos, Category::Threes];

/// Decision policy for one side of the table.
pub trait TurnPolicy: Send + Sync {
    /// Choose which dice to keep given the current roll and open categories.
    fn keep(&self, dice: &DiceSet, card: &Scorecard) -> KeepSet;

    /// Choose the category to score. Returns `None` only for a full card.
    fn choose_category(&self, dice: &DiceSet, card: &Scorecard) -> Option<Category>;
}

/// Greedy heuristic: chase the most common face, take the best score.
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy;

impl TurnPolicy for HeuristicPolicy {
    fn keep(&self, dice: &DiceSet, card: &Scorecard) -> KeepSet {
        decide_keep(dice, card)
    }

    fn choose_category(&self, dice: &DiceSet, card: &Scorecard) -> Option<Category> {
        decide_score(dice, card)
    }
}

/// Keep decision.
///
/// Priority cascade:
/// 1. An open yacht, large straight or full house is already showing: keep
///    every die.
/// 2. Otherwise keep the dice showing the most common face (ties go to the
///    higher face), if it appears more than once.
/// 3. Otherwise keep nothing.
#[must_use]
pub fn decide_keep(dice: &DiceSet, card: &Scorecard) -> KeepSet {
    let locked = LOCK_IN
        .iter()
        .any(|&c| !card.is_scored(c) && score(c, dice) > 0);
    if locked {
        return (0..DICE_COUNT).collect();
    }

    let counts = dice.face_counts();
    // Ascending scan: `max_by_key` keeps the last maximum, i.e. the higher face.
    let (face, count) = (1..=6u8)
        .map(|f| (f, counts[f as usize]))
        .max_by_key(|&(_, c)| c)
        .unwrap_or((6, 0));
    if count <= 1 {
        return KeepSet::new();
    }

    dice.iter()
        .enumerate()
        .filter(|(_, d)| d.face.value() == face)
        .map(|(i, _)| i)
        .collect()
}

/// Score decision.
///
/// Picks the open category with the highest score, ties going to the
/// earlier category. When nothing scores, sacrifices the cheapest open upper
/// category among aces/twos/threes, then chance, then the first open one.
#[must_use]
pub fn decide_score(dice: &DiceSet, card: &Scorecard) -> Option<Category> {
    let mut best: Option<(Category, u32)> = None;
    for category in card.open_categories() {
        let s = score(category, dice);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((category, s));
        }
    }

    let (best_category, best_score) = best?;
    if best_score > 0 {
        return Some(best_category);
    }

    SACRIFICE
        .into_iter()
        .chain(std::iter::once(Category::Chance))
        .find(|&c| !card.is_scored(c))
        .or_else(|| card.open_categories().next())
}
