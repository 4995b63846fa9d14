//! Single-player opponent.
//!
//! The opponent plays its turn as a sequence of discrete steps so the
//! controller can pace them with scheduled delays:
//!
//! ```text
//! begin_turn -> Roll -> Keep -> Roll -> Keep -> Roll -> Score
//! ```
//!
//! Every step yields the same `Action`s a remote peer would send, so the
//! local session applies them through `apply_peer_action`.

use tracing::debug;

use crate::core::{Action, DiceSet, GameRng, Scorecard, DICE_COUNT, ROLLS_PER_TURN};
use crate::rules::score;

use super::policy::{HeuristicPolicy, TurnPolicy};

/// Where the opponent is in its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiPhase {
    /// Not the opponent's turn.
    Idle,
    /// Next step rolls the unkept dice.
    Roll,
    /// Next step decides which dice to keep.
    Keep,
    /// Next step writes a score.
    Score,
}

/// Result of one opponent step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiStep {
    /// Actions to apply, in order.
    pub actions: Vec<Action>,
    /// The turn is over; no further step should be scheduled.
    pub done: bool,
}

/// AI opponent with its own dice and RNG.
#[derive(Clone, Debug)]
pub struct AiOpponent<P: TurnPolicy = HeuristicPolicy> {
    policy: P,
    rng: GameRng,
    dice: DiceSet,
    rolls_left: u8,
    phase: AiPhase,
}

impl AiOpponent<HeuristicPolicy> {
    /// Create an opponent using the default heuristic.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self::with_policy(HeuristicPolicy, rng)
    }
}

impl<P: TurnPolicy> AiOpponent<P> {
    /// Create an opponent with a custom policy.
    #[must_use]
    pub fn with_policy(policy: P, rng: GameRng) -> Self {
        Self {
            policy,
            rng,
            dice: DiceSet::initial(),
            rolls_left: ROLLS_PER_TURN,
            phase: AiPhase::Idle,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AiPhase {
        self.phase
    }

    /// The opponent's private dice.
    #[must_use]
    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    /// Start a turn from fresh dice.
    pub fn begin_turn(&mut self) {
        self.dice = DiceSet::initial();
        self.rolls_left = ROLLS_PER_TURN;
        self.phase = AiPhase::Roll;
    }

    /// Stop mid-turn (the session ended).
    pub fn halt(&mut self) {
        self.phase = AiPhase::Idle;
    }

    /// Take the next step of the turn against the opponent's own scorecard.
    ///
    /// Returns `None` when idle.
    pub fn step(&mut self, card: &Scorecard) -> Option<AiStep> {
        match self.phase {
            AiPhase::Idle => None,
            AiPhase::Roll => {
                let rng = &mut self.rng;
                self.dice.roll_unkept(|| rng.roll_die());
                self.rolls_left -= 1;
                self.phase = if self.rolls_left > 0 {
                    AiPhase::Keep
                } else {
                    AiPhase::Score
                };
                debug!(dice = %self.dice, rolls_left = self.rolls_left, "ai rolled");
                Some(AiStep {
                    actions: vec![Action::Roll {
                        dice: self.dice.faces(),
                    }],
                    done: false,
                })
            }
            AiPhase::Keep => {
                let keep = self.policy.keep(&self.dice, card);
                let mut mask = [false; DICE_COUNT];
                for &i in &keep {
                    if let Some(slot) = mask.get_mut(i) {
                        *slot = true;
                    }
                }

                let actions = self
                    .dice
                    .kept_mask()
                    .into_iter()
                    .zip(mask)
                    .enumerate()
                    .filter(|(_, (was, now))| was != now)
                    .map(|(index, (_, kept))| Action::Keep { index, kept })
                    .collect();
                self.dice.set_kept_mask(mask);
                self.phase = AiPhase::Roll;
                debug!(dice = %self.dice, "ai kept");
                Some(AiStep {
                    actions,
                    done: false,
                })
            }
            AiPhase::Score => {
                self.phase = AiPhase::Idle;
                let category = self.policy.choose_category(&self.dice, card)?;
                let points = score(category, &self.dice);
                debug!(%category, score = points, "ai scored");
                Some(AiStep {
                    actions: vec![Action::Score {
                        category,
                        score: points,
                    }],
                    done: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Category;

    fn run_turn(ai: &mut AiOpponent, card: &Scorecard) -> Vec<Action> {
        ai.begin_turn();
        let mut actions = Vec::new();
        while let Some(step) = ai.step(card) {
            actions.extend(step.actions);
            if step.done {
                break;
            }
        }
        actions
    }

    #[test]
    fn test_idle_does_nothing() {
        let mut ai = AiOpponent::new(GameRng::new(1));
        assert_eq!(ai.phase(), AiPhase::Idle);
        assert!(ai.step(&Scorecard::new()).is_none());
    }

    #[test]
    fn test_turn_shape() {
        let mut ai = AiOpponent::new(GameRng::new(3));
        let actions = run_turn(&mut ai, &Scorecard::new());

        let rolls = actions.iter().filter(|a| matches!(a, Action::Roll { .. })).count();
        assert_eq!(rolls, 3);
        assert!(matches!(actions.last(), Some(Action::Score { .. })));
        assert_eq!(ai.phase(), AiPhase::Idle);
    }

    #[test]
    fn test_score_matches_final_dice() {
        let mut ai = AiOpponent::new(GameRng::new(11));
        let actions = run_turn(&mut ai, &Scorecard::new());

        let Some(Action::Score { category, score: points }) = actions.last().cloned() else {
            panic!("turn must end with a score");
        };
        assert_eq!(points, score(category, ai.dice()));
    }

    #[test]
    fn test_kept_dice_hold_between_rolls() {
        let mut ai = AiOpponent::new(GameRng::new(5));
        let card = Scorecard::new();
        ai.begin_turn();

        ai.step(&card).unwrap();
        ai.step(&card).unwrap();
        let held: Vec<_> = ai
            .dice()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kept)
            .map(|(i, d)| (i, d.face))
            .collect();

        ai.step(&card).unwrap();
        for (i, face) in held {
            assert_eq!(ai.dice().get(i).unwrap().face, face);
        }
    }

    #[test]
    fn test_plays_full_game_without_rescoring() {
        let mut ai = AiOpponent::new(GameRng::new(99));
        let mut card = Scorecard::new();

        for _ in 0..Category::ALL.len() {
            let actions = run_turn(&mut ai, &card);
            let Some(Action::Score { category, score }) = actions.last().cloned() else {
                panic!("turn must end with a score");
            };
            assert!(!card.is_scored(category));
            card.record(category, score).unwrap();
        }

        assert!(card.is_complete());
        assert!(ai.step(&card).is_none());
    }

    #[test]
    fn test_halt_stops_turn() {
        let mut ai = AiOpponent::new(GameRng::new(2));
        ai.begin_turn();
        ai.halt();
        assert!(ai.step(&Scorecard::new()).is_none());
    }
}
