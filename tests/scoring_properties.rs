//! Property-based tests for the scoring engine and the AI score choice.

use proptest::prelude::*;

use yacht_duel::ai::decide_score;
use yacht_duel::core::{Category, DiceSet, Scorecard, UPPER_BONUS, CATEGORY_COUNT};
use yacht_duel::rules::{score, FULL_HOUSE_SCORE, YACHT_SCORE};

/// Strategy: five faces in 1..=6.
fn dice_strategy() -> impl Strategy<Value = [u8; 5]> {
    prop::array::uniform5(1..=6u8)
}

fn category_strategy() -> impl Strategy<Value = Category> {
    (0..CATEGORY_COUNT).prop_map(|i| Category::ALL[i])
}

proptest! {
    // Scoring is deterministic and ignores kept flags.
    #[test]
    fn score_is_pure(values in dice_strategy(), category in category_strategy(), kept in prop::array::uniform5(any::<bool>())) {
        let plain = DiceSet::from_values(values);
        let mut held = plain;
        held.set_kept_mask(kept);
        prop_assert_eq!(score(category, &plain), score(category, &plain));
        prop_assert_eq!(score(category, &plain), score(category, &held));
    }

    // Scoring does not depend on die order.
    #[test]
    fn score_ignores_order(values in dice_strategy(), category in category_strategy()) {
        let mut sorted = values;
        sorted.sort_unstable();
        prop_assert_eq!(
            score(category, &DiceSet::from_values(values)),
            score(category, &DiceSet::from_values(sorted))
        );
    }

    // Full house and yacht never both score.
    #[test]
    fn full_house_excludes_yacht(values in dice_strategy()) {
        let dice = DiceSet::from_values(values);
        let full_house = score(Category::FullHouse, &dice);
        let yacht = score(Category::Yacht, &dice);
        prop_assert!(full_house == 0 || yacht == 0);
        prop_assert!(full_house == 0 || full_house == FULL_HOUSE_SCORE);
        prop_assert!(yacht == 0 || yacht == YACHT_SCORE);
    }

    // A scoring four-of-a-kind equals the dice sum.
    #[test]
    fn four_of_a_kind_is_sum(values in dice_strategy()) {
        let dice = DiceSet::from_values(values);
        let s = score(Category::FourOfAKind, &dice);
        prop_assert!(s == 0 || s == score(Category::Chance, &dice));
    }

    // A large straight is always a small straight.
    #[test]
    fn large_implies_small(values in dice_strategy()) {
        let dice = DiceSet::from_values(values);
        if score(Category::LargeStraight, &dice) > 0 {
            prop_assert!(score(Category::SmallStraight, &dice) > 0);
        }
    }

    // The upper bonus is exactly 0 or 35.
    #[test]
    fn upper_bonus_is_binary(counts in prop::array::uniform6(0..=5u32)) {
        let mut card = Scorecard::new();
        for (face, (category, count)) in (1u32..).zip(Category::UPPER.into_iter().zip(counts)) {
            card.record(category, face * count).unwrap();
        }
        prop_assert!(card.upper_bonus() == 0 || card.upper_bonus() == UPPER_BONUS);
        prop_assert_eq!(card.upper_bonus() == UPPER_BONUS, card.upper_sum() >= 63);
    }

    // The AI never picks a category that is already scored.
    #[test]
    fn ai_never_rescores(values in dice_strategy(), scored in prop::collection::vec(category_strategy(), 0..CATEGORY_COUNT)) {
        let mut card = Scorecard::new();
        for category in scored {
            let _ = card.record(category, 0);
        }
        match decide_score(&DiceSet::from_values(values), &card) {
            Some(choice) => prop_assert!(!card.is_scored(choice)),
            None => prop_assert!(card.is_complete()),
        }
    }
}

#[test]
fn test_reference_rolls() {
    let cases: [([u8; 5], Category, u32); 8] = [
        ([1, 1, 1, 1, 1], Category::Yacht, 50),
        ([1, 1, 1, 1, 1], Category::Aces, 5),
        ([1, 1, 1, 1, 1], Category::FullHouse, 0),
        ([2, 2, 3, 3, 3], Category::FullHouse, 25),
        ([1, 2, 3, 4, 5], Category::LargeStraight, 40),
        ([1, 2, 3, 4, 5], Category::SmallStraight, 30),
        ([6, 6, 6, 6, 1], Category::FourOfAKind, 25),
        ([6, 6, 6, 6, 1], Category::Sixes, 24),
    ];
    for (values, category, expected) in cases {
        assert_eq!(
            score(category, &DiceSet::from_values(values)),
            expected,
            "{values:?} in {category}"
        );
    }
}
