//! Turn state machine.
//!
//! ```text
//! WaitingForMatch -> MyTurn(3) -> MyTurn(2) -> MyTurn(1) -> MyTurn(0)
//!                      ^                                       |
//!                      |            [category committed]       v
//!                      +----------------- OpponentTurn <-------+
//!                                              |
//!                                              v
//!                                           GameOver
//! ```
//!
//! Local operations validate timing and return the action to propagate.
//! Peer operations are applied without re-validating turn ownership: the
//! relay model trusts the other side completely.
//!
//! An immediate yacht locks the dice and zeroes `rolls_left` on the rolling
//! client only. The peer keeps counting the rolls it has seen until the
//! yacht score arrives and passes the turn.

use tracing::{debug, info, warn};

use crate::core::{
    Action, ActionKind, Category, EndReason, GameError, GameRng, GameSession, Mode, Result, Seat,
    ROLLS_PER_TURN,
};
use crate::rules;

/// What a local roll produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollOutcome {
    /// The roll to propagate.
    pub action: Action,
    /// The roll was an open yacht: dice are locked and the caller must
    /// schedule the auto-score.
    pub yacht_pending: bool,
}

/// Owns this client's `GameSession` and enforces the turn rules.
#[derive(Clone, Debug)]
pub struct TurnStateMachine {
    session: GameSession,
    /// Turn in which an immediate yacht is waiting to be auto-scored.
    yacht_pending: Option<u32>,
    /// Turn in which the yacht short-circuit last fired.
    yacht_fired: Option<u32>,
}

impl TurnStateMachine {
    /// Create a machine waiting for a match.
    #[must_use]
    pub fn new(mode: Mode, rng: GameRng) -> Self {
        Self {
            session: GameSession::new(mode, rng),
            yacht_pending: None,
            yacht_fired: None,
        }
    }

    /// Read-only view of the session.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access to the session RNG (the AI forks its own from it).
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.session.rng
    }

    /// Check if an immediate yacht is waiting to be auto-scored.
    #[must_use]
    pub fn yacht_pending(&self) -> bool {
        self.yacht_pending.is_some()
    }

    /// Leave `WaitingForMatch`, with `first` owning the opening turn.
    pub fn start_match(&mut self, first: Seat) {
        if self.session.is_matched() {
            warn!(?first, "match already started; ignoring");
            return;
        }
        info!(mode = ?self.session.mode(), ?first, "match started");
        self.session.begin_match(first);
    }

    // === Local operations ===

    /// Re-roll every unkept die.
    pub fn roll(&mut self) -> Result<RollOutcome> {
        self.ensure_my_turn(ActionKind::Roll)?;
        if self.session.rolls_left() == 0 {
            return Err(GameError::timing(ActionKind::Roll, "no rolls left this turn"));
        }

        self.session.roll_unkept();
        self.session.set_rolls_left(self.session.rolls_left() - 1);

        let action = Action::Roll {
            dice: self.session.dice().faces(),
        };
        self.session.record(Seat::Me, action.clone());
        debug!(dice = %self.session.dice(), rolls_left = self.session.rolls_left(), "rolled");

        let yacht_pending = self.check_immediate_yacht();
        Ok(RollOutcome {
            action,
            yacht_pending,
        })
    }

    /// Flip the kept flag of one die.
    pub fn toggle_keep(&mut self, index: usize) -> Result<Action> {
        self.ensure_my_turn(ActionKind::Keep)?;
        let rolls_left = self.session.rolls_left();
        if rolls_left == ROLLS_PER_TURN {
            return Err(GameError::timing(ActionKind::Keep, "no roll yet this turn"));
        }
        if rolls_left == 0 {
            return Err(GameError::timing(ActionKind::Keep, "no rolls left to keep for"));
        }

        let die = self
            .session
            .dice()
            .get(index)
            .copied()
            .ok_or(GameError::InvalidDieIndex(index))?;
        let kept = !die.kept;
        self.session.dice_mut().set_kept(index, kept);

        let action = Action::Keep { index, kept };
        self.session.record(Seat::Me, action.clone());
        Ok(action)
    }

    /// Score the current dice in `category` and hand the turn over.
    pub fn commit_score(&mut self, category: Category) -> Result<Action> {
        self.ensure_my_turn(ActionKind::Score)?;
        if self.session.rolls_left() == ROLLS_PER_TURN {
            return Err(GameError::timing(ActionKind::Score, "no roll yet this turn"));
        }
        if self.yacht_pending.is_some() && category != Category::Yacht {
            return Err(GameError::timing(ActionKind::Score, "yacht auto-score pending"));
        }

        let score = rules::score(category, self.session.dice());
        self.session.scorecard_mut(Seat::Me).record(category, score)?;

        let action = Action::Score { category, score };
        self.session.record(Seat::Me, action.clone());
        info!(%category, score, turn = self.session.turn_number(), "committed score");

        self.yacht_pending = None;
        self.session.pass_turn();
        self.check_game_over();
        Ok(action)
    }

    /// Fire the scheduled yacht auto-score for `turn`.
    ///
    /// Returns `Ok(None)` when the timer is stale (the turn moved on).
    pub fn auto_score_yacht(&mut self, turn: u32) -> Result<Option<Action>> {
        if self.yacht_pending != Some(turn) || self.session.turn_number() != turn {
            debug!(turn, "stale yacht timer dropped");
            return Ok(None);
        }
        self.commit_score(Category::Yacht).map(Some)
    }

    // === Peer operations ===

    /// Apply an action taken by the opponent (remote peer or AI).
    pub fn apply_peer_action(&mut self, action: &Action) -> Result<()> {
        if self.session.is_game_over() {
            return Err(GameError::GameOver);
        }

        match *action {
            Action::Roll { dice } => {
                self.session.dice_mut().set_faces(dice);
                let rolls_left = self.session.rolls_left().saturating_sub(1);
                self.session.set_rolls_left(rolls_left);
            }
            Action::Keep { index, kept } => {
                if !self.session.dice_mut().set_kept(index, kept) {
                    debug!(index, "peer keep index out of range; ignored");
                    return Ok(());
                }
            }
            Action::Score { category, score } => {
                if let Err(err) = self.session.scorecard_mut(Seat::Opponent).record(category, score) {
                    warn!(%category, score, error = %err, "duplicate peer score ignored");
                    return Ok(());
                }
                self.session.record(Seat::Opponent, action.clone());
                if self.session.turn_owner() == Seat::Opponent {
                    self.session.pass_turn();
                } else {
                    warn!(%category, "peer scored during our turn; keeping our turn");
                }
                self.check_game_over();
                return Ok(());
            }
        }

        self.session.record(Seat::Opponent, action.clone());
        Ok(())
    }

    /// Force `GameOver` after the peer disconnected.
    pub fn end_by_peer_loss(&mut self) {
        if self.session.is_game_over() {
            return;
        }
        warn!("peer lost; ending session");
        self.yacht_pending = None;
        self.session.end(EndReason::PeerLost);
    }

    // === Internals ===

    fn ensure_my_turn(&self, action: ActionKind) -> Result<()> {
        if self.session.is_game_over() {
            return Err(GameError::GameOver);
        }
        if !self.session.is_matched() {
            return Err(GameError::NoMatch);
        }
        if self.session.turn_owner() != Seat::Me {
            return Err(GameError::timing(action, "not your turn"));
        }
        Ok(())
    }

    /// Lock the dice if the roll is an open yacht. Fires at most once per turn.
    fn check_immediate_yacht(&mut self) -> bool {
        let turn = self.session.turn_number();
        if self.yacht_fired == Some(turn) {
            return false;
        }
        let open = !self.session.scorecard(Seat::Me).is_scored(Category::Yacht);
        if !open || !rules::is_yacht(self.session.dice()) {
            return false;
        }

        self.session.dice_mut().keep_all();
        self.session.set_rolls_left(0);
        self.yacht_fired = Some(turn);
        self.yacht_pending = Some(turn);
        info!(turn, dice = %self.session.dice(), "immediate yacht");
        true
    }

    fn check_game_over(&mut self) {
        let mine = self.session.scorecard(Seat::Me).is_complete();
        let theirs = self.session.scorecard(Seat::Opponent).is_complete();
        if mine && theirs {
            let outcome = self.session.outcome();
            info!(
                mine = outcome.totals[Seat::Me],
                opponent = outcome.totals[Seat::Opponent],
                winner = ?outcome.winner,
                "game over"
            );
            self.session.end(EndReason::Completed);
        }
    }
}

#[cfg(test)]
impl TurnStateMachine {
    /// Put the machine in the state right after a first roll showing `values`.
    pub(crate) fn force_roll(&mut self, values: [u8; 5]) {
        self.session
            .dice_mut()
            .set_faces(values.map(crate::core::Face::clamped));
        self.session.set_rolls_left(ROLLS_PER_TURN - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiceSet, Face, TurnState, DICE_COUNT};

    fn machine(first: Seat) -> TurnStateMachine {
        let mut m = TurnStateMachine::new(Mode::Multiplayer, GameRng::new(42));
        m.start_match(first);
        m
    }

    fn faces(values: [u8; 5]) -> [Face; 5] {
        values.map(Face::clamped)
    }

    #[test]
    fn test_actions_before_match_rejected() {
        let mut m = TurnStateMachine::new(Mode::Multiplayer, GameRng::new(1));
        assert!(matches!(m.roll(), Err(GameError::NoMatch)));
        assert_eq!(m.session().turn_state(), TurnState::WaitingForMatch);
    }

    #[test]
    fn test_roll_decrements_and_stops_at_zero() {
        let mut m = machine(Seat::Me);
        let outcome = m.roll().unwrap();
        assert_eq!(outcome.action, Action::Roll { dice: m.session().dice().faces() });

        while m.session().rolls_left() > 0 {
            m.roll().unwrap();
        }

        let err = m.roll().unwrap_err();
        assert!(matches!(err, GameError::InvalidTiming { action: ActionKind::Roll, .. }));
        assert_eq!(m.session().rolls_left(), 0);
    }

    #[test]
    fn test_roll_not_my_turn() {
        let mut m = machine(Seat::Opponent);
        assert!(matches!(m.roll(), Err(GameError::InvalidTiming { .. })));
        assert_eq!(m.session().rolls_left(), ROLLS_PER_TURN);
    }

    #[test]
    fn test_kept_dice_survive_roll() {
        let mut m = machine(Seat::Me);
        m.force_roll([2, 3, 4, 6, 6]);

        m.toggle_keep(0).unwrap();
        m.toggle_keep(3).unwrap();
        m.roll().unwrap();

        let after = m.session().dice().values();
        assert_eq!(after[0], 2);
        assert_eq!(after[3], 6);
        assert_eq!(m.session().rolls_left(), 1);
    }

    #[test]
    fn test_toggle_keep_windows() {
        let mut m = machine(Seat::Me);

        // Before the first roll.
        assert!(matches!(m.toggle_keep(0), Err(GameError::InvalidTiming { .. })));

        m.force_roll([1, 2, 3, 5, 5]);
        assert_eq!(m.toggle_keep(1).unwrap(), Action::Keep { index: 1, kept: true });
        assert_eq!(m.toggle_keep(1).unwrap(), Action::Keep { index: 1, kept: false });
        assert!(matches!(
            m.toggle_keep(DICE_COUNT),
            Err(GameError::InvalidDieIndex(5))
        ));

        m.session.set_rolls_left(0);
        assert!(matches!(m.toggle_keep(0), Err(GameError::InvalidTiming { .. })));
        assert_eq!(m.session().dice().kept_mask(), [false; 5]);
    }

    #[test]
    fn test_commit_requires_a_roll() {
        let mut m = machine(Seat::Me);
        assert!(matches!(
            m.commit_score(Category::Chance),
            Err(GameError::InvalidTiming { .. })
        ));
    }

    #[test]
    fn test_commit_scores_and_passes_turn() {
        let mut m = machine(Seat::Me);
        m.force_roll([2, 2, 3, 3, 3]);

        let action = m.commit_score(Category::FullHouse).unwrap();

        assert_eq!(action, Action::Score { category: Category::FullHouse, score: 25 });
        assert_eq!(m.session().scorecard(Seat::Me).get(Category::FullHouse), Some(25));
        assert_eq!(m.session().turn_state(), TurnState::OpponentTurn);
        assert_eq!(m.session().dice(), &DiceSet::initial());
        assert_eq!(m.session().rolls_left(), ROLLS_PER_TURN);
    }

    #[test]
    fn test_category_committed_once() {
        let mut m = machine(Seat::Me);
        m.force_roll([1, 2, 3, 4, 6]);
        m.commit_score(Category::Chance).unwrap();
        m.apply_peer_action(&Action::Score { category: Category::Aces, score: 2 })
            .unwrap();

        m.force_roll([6, 6, 5, 5, 1]);
        let err = m.commit_score(Category::Chance).unwrap_err();
        assert!(matches!(err, GameError::AlreadyScored(Category::Chance)));
        assert_eq!(m.session().scorecard(Seat::Me).get(Category::Chance), Some(16));
        assert_eq!(m.session().turn_owner(), Seat::Me);
    }

    #[test]
    fn test_immediate_yacht_short_circuit() {
        let mut m = machine(Seat::Me);
        m.force_roll([6, 6, 6, 6, 6]);
        m.session.dice_mut().keep_all();

        let outcome = m.roll().unwrap();

        assert!(outcome.yacht_pending);
        assert!(m.yacht_pending());
        assert_eq!(m.session().rolls_left(), 0);
        assert_eq!(m.session().dice().kept_mask(), [true; 5]);
        assert!(matches!(m.toggle_keep(2), Err(GameError::InvalidTiming { .. })));
        assert!(matches!(
            m.commit_score(Category::Sixes),
            Err(GameError::InvalidTiming { .. })
        ));

        let turn = m.session().turn_number();
        let action = m.auto_score_yacht(turn).unwrap();
        assert_eq!(action, Some(Action::Score { category: Category::Yacht, score: 50 }));
        assert!(!m.yacht_pending());
        assert_eq!(m.session().turn_owner(), Seat::Opponent);

        // The timer cannot fire twice.
        assert_eq!(m.auto_score_yacht(turn).unwrap(), None);
    }

    #[test]
    fn test_no_short_circuit_when_yacht_scored() {
        let mut m = machine(Seat::Me);
        m.force_roll([3, 3, 3, 3, 3]);
        m.commit_score(Category::Yacht).unwrap();
        m.apply_peer_action(&Action::Score { category: Category::Chance, score: 20 })
            .unwrap();

        m.force_roll([3, 3, 3, 3, 3]);
        m.session.dice_mut().keep_all();
        let outcome = m.roll().unwrap();

        assert!(!outcome.yacht_pending);
        assert_eq!(m.session().rolls_left(), 1);
    }

    #[test]
    fn test_peer_actions_update_view() {
        let mut m = machine(Seat::Opponent);

        m.apply_peer_action(&Action::Roll { dice: faces([4, 4, 2, 6, 4]) }).unwrap();
        assert_eq!(m.session().dice().values(), [4, 4, 2, 6, 4]);
        assert_eq!(m.session().rolls_left(), 2);

        m.apply_peer_action(&Action::Keep { index: 0, kept: true }).unwrap();
        assert!(m.session().dice().kept_mask()[0]);

        m.apply_peer_action(&Action::Keep { index: 11, kept: true }).unwrap();

        m.apply_peer_action(&Action::Score { category: Category::Fours, score: 12 }).unwrap();
        assert_eq!(m.session().scorecard(Seat::Opponent).get(Category::Fours), Some(12));
        assert_eq!(m.session().turn_state(), TurnState::MyTurn { rolls_left: 3 });
        assert_eq!(m.session().dice(), &DiceSet::initial());
    }

    #[test]
    fn test_duplicate_peer_score_ignored() {
        let mut m = machine(Seat::Opponent);
        m.apply_peer_action(&Action::Score { category: Category::Yacht, score: 50 }).unwrap();
        assert_eq!(m.session().turn_owner(), Seat::Me);

        m.apply_peer_action(&Action::Score { category: Category::Yacht, score: 0 }).unwrap();
        assert_eq!(m.session().scorecard(Seat::Opponent).get(Category::Yacht), Some(50));
        assert_eq!(m.session().turn_owner(), Seat::Me);
    }

    #[test]
    fn test_peer_loss_is_terminal() {
        let mut m = machine(Seat::Me);
        m.end_by_peer_loss();

        assert_eq!(m.session().turn_state(), TurnState::GameOver(EndReason::PeerLost));
        assert!(matches!(m.roll(), Err(GameError::GameOver)));
        assert!(matches!(
            m.apply_peer_action(&Action::Keep { index: 0, kept: true }),
            Err(GameError::GameOver)
        ));
    }

    #[test]
    fn test_game_over_after_both_cards_full() {
        let mut m = machine(Seat::Me);
        for (i, category) in Category::ALL.into_iter().enumerate() {
            m.force_roll([1, 2, 4, 4, 5]);
            m.commit_score(category).unwrap();
            assert!(!m.session().is_game_over(), "over after my commit {i}");

            m.apply_peer_action(&Action::Score { category, score: 0 }).unwrap();
        }

        assert_eq!(m.session().turn_state(), TurnState::GameOver(EndReason::Completed));
        assert!(m.session().scorecard(Seat::Me).is_complete());
        assert_eq!(m.session().outcome().winner, Some(Seat::Me));
    }

    #[test]
    fn test_stale_yacht_timer() {
        let mut m = machine(Seat::Me);
        assert_eq!(m.auto_score_yacht(1).unwrap(), None);
        assert_eq!(m.auto_score_yacht(99).unwrap(), None);
    }
}
