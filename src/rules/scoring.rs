//! Category scoring.
//!
//! `score` is pure and total: every combination of five faces maps to a
//! non-negative score for every category. Kept flags are ignored. Nothing here
//! touches a scorecard, so the UI can call it speculatively.

use crate::core::{Category, DiceSet, Scorecard};

/// Fixed score for a full house.
pub const FULL_HOUSE_SCORE: u32 = 25;
/// Fixed score for a small straight.
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
/// Fixed score for a large straight.
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
/// Fixed score for a yacht.
pub const YACHT_SCORE: u32 = 50;

/// Compute the score for placing `dice` in `category`.
///
/// ```
/// use yacht_duel::core::{Category, DiceSet};
/// use yacht_duel::rules::score;
///
/// let dice = DiceSet::from_values([2, 2, 3, 3, 3]);
/// assert_eq!(score(Category::FullHouse, &dice), 25);
/// assert_eq!(score(Category::Threes, &dice), 9);
/// ```
#[must_use]
pub fn score(category: Category, dice: &DiceSet) -> u32 {
    let counts = dice.face_counts();

    match category {
        Category::Aces
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.upper_face().unwrap_or(0);
            u32::from(counts[face as usize]) * u32::from(face)
        }
        Category::Chance => dice.sum(),
        Category::FourOfAKind => {
            if max_count(&counts) >= 4 {
                dice.sum()
            } else {
                0
            }
        }
        Category::FullHouse => {
            let has_three = counts.iter().any(|&c| c == 3);
            let has_two = counts.iter().any(|&c| c == 2);
            if has_three && has_two {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            if longest_run(&counts) >= 4 {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if longest_run(&counts) == 5 {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yacht => {
            if max_count(&counts) == 5 {
                YACHT_SCORE
            } else {
                0
            }
        }
    }
}

/// Speculative scores for every open category, in scorecard order.
#[must_use]
pub fn estimate(dice: &DiceSet, scorecard: &Scorecard) -> Vec<(Category, u32)> {
    scorecard
        .open_categories()
        .map(|category| (category, score(category, dice)))
        .collect()
}

/// Check whether the dice are a yacht.
#[must_use]
pub fn is_yacht(dice: &DiceSet) -> bool {
    score(Category::Yacht, dice) == YACHT_SCORE
}

fn max_count(counts: &[u8; 7]) -> u8 {
    counts[1..].iter().copied().max().unwrap_or(0)
}

/// Length of the longest run of consecutive faces present.
fn longest_run(counts: &[u8; 7]) -> usize {
    let mut best = 0;
    let mut run = 0;
    for &count in &counts[1..] {
        if count > 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(values: [u8; 5]) -> DiceSet {
        DiceSet::from_values(values)
    }

    #[test]
    fn test_all_ones() {
        let d = dice([1, 1, 1, 1, 1]);
        assert_eq!(score(Category::Yacht, &d), 50);
        assert_eq!(score(Category::FourOfAKind, &d), 5);
        assert_eq!(score(Category::Chance, &d), 5);
        assert_eq!(score(Category::Aces, &d), 5);
        assert_eq!(score(Category::FullHouse, &d), 0);
    }

    #[test]
    fn test_full_house() {
        let d = dice([2, 2, 3, 3, 3]);
        assert_eq!(score(Category::FullHouse, &d), 25);
        assert_eq!(score(Category::FourOfAKind, &d), 0);
        assert_eq!(score(Category::Chance, &d), 13);
        assert_eq!(score(Category::Yacht, &d), 0);
    }

    #[test]
    fn test_large_straight() {
        let d = dice([1, 2, 3, 4, 5]);
        assert_eq!(score(Category::LargeStraight, &d), 40);
        assert_eq!(score(Category::SmallStraight, &d), 30);
        assert_eq!(score(Category::Chance, &d), 15);

        let d = dice([6, 2, 5, 3, 4]);
        assert_eq!(score(Category::LargeStraight, &d), 40);
    }

    #[test]
    fn test_four_of_a_kind() {
        let d = dice([6, 6, 6, 6, 1]);
        assert_eq!(score(Category::FourOfAKind, &d), 25);
        assert_eq!(score(Category::Yacht, &d), 0);
        assert_eq!(score(Category::FullHouse, &d), 0);
        assert_eq!(score(Category::Sixes, &d), 24);
    }

    #[test]
    fn test_small_straight_runs() {
        assert_eq!(score(Category::SmallStraight, &dice([1, 2, 3, 4, 4])), 30);
        assert_eq!(score(Category::SmallStraight, &dice([3, 4, 5, 6, 1])), 30);
        assert_eq!(score(Category::SmallStraight, &dice([2, 3, 4, 5, 2])), 30);
        assert_eq!(score(Category::SmallStraight, &dice([1, 2, 3, 5, 6])), 0);
        assert_eq!(score(Category::LargeStraight, &dice([1, 2, 3, 4, 4])), 0);
        assert_eq!(score(Category::LargeStraight, &dice([1, 2, 3, 4, 6])), 0);
    }

    #[test]
    fn test_upper_section() {
        let d = dice([5, 5, 2, 5, 1]);
        assert_eq!(score(Category::Aces, &d), 1);
        assert_eq!(score(Category::Twos, &d), 2);
        assert_eq!(score(Category::Threes, &d), 0);
        assert_eq!(score(Category::Fives, &d), 15);
    }

    #[test]
    fn test_kept_flags_ignored() {
        let mut d = dice([4, 4, 4, 2, 2]);
        let before = score(Category::FullHouse, &d);
        d.keep_all();
        assert_eq!(score(Category::FullHouse, &d), before);
    }

    #[test]
    fn test_estimate_skips_scored() {
        let mut card = Scorecard::new();
        card.record(Category::Yacht, 0).unwrap();
        card.record(Category::Aces, 2).unwrap();

        let d = dice([3, 3, 3, 3, 3]);
        let estimates = estimate(&d, &card);

        assert_eq!(estimates.len(), 10);
        assert!(estimates.iter().all(|(c, _)| *c != Category::Yacht));
        assert!(estimates.contains(&(Category::Threes, 15)));
        assert!(estimates.contains(&(Category::FourOfAKind, 15)));
        // Estimating must not write anything.
        assert_eq!(card.filled(), 2);
    }

    #[test]
    fn test_is_yacht() {
        assert!(is_yacht(&dice([6, 6, 6, 6, 6])));
        assert!(!is_yacht(&dice([6, 6, 6, 6, 5])));
    }
}
