//! Game session state.
//!
//! ## GameSession
//!
//! This client's view of the match:
//! - Both scorecards
//! - Turn owner, rolls left, the current dice
//! - Game-over flag and reason
//! - Action history
//!
//! The peer holds its own, independently owned session. The two are
//! reconciled only through exchanged actions and may transiently diverge.
//! All mutation goes through `TurnStateMachine`.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::dice::DiceSet;
use super::rng::GameRng;
use super::scorecard::Scorecard;
use super::seat::{Seat, SeatMap};

/// Rolls available at the start of every turn.
pub const ROLLS_PER_TURN: u8 = 3;

/// Who the second participant is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Against the built-in AI.
    Singleplayer,
    /// Against a remote peer over the relay.
    Multiplayer,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every required scorecard is full.
    Completed,
    /// The peer disconnected.
    PeerLost,
}

/// Coarse turn state, as seen by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    WaitingForMatch,
    MyTurn { rolls_left: u8 },
    OpponentTurn,
    GameOver(EndReason),
}

/// Final (or running) totals and the leader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub totals: SeatMap<u32>,
    /// `None` on a draw.
    pub winner: Option<Seat>,
}

/// This client's session.
#[derive(Clone, Debug)]
pub struct GameSession {
    mode: Mode,
    matched: bool,
    turn_owner: Seat,
    rolls_left: u8,
    dice: DiceSet,
    scorecards: SeatMap<Scorecard>,
    end_reason: Option<EndReason>,
    /// Starts at 1 and increments on every turn flip.
    turn_number: u32,
    action_sequence: u32,
    history: Vector<ActionRecord>,
    /// Deterministic dice source.
    pub rng: GameRng,
}

impl GameSession {
    /// Create a session that is still waiting for a match.
    #[must_use]
    pub fn new(mode: Mode, rng: GameRng) -> Self {
        Self {
            mode,
            matched: false,
            turn_owner: Seat::Me,
            rolls_left: ROLLS_PER_TURN,
            dice: DiceSet::initial(),
            scorecards: SeatMap::with_value(Scorecard::new()),
            end_reason: None,
            turn_number: 1,
            action_sequence: 0,
            history: Vector::new(),
            rng,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn turn_owner(&self) -> Seat {
        self.turn_owner
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.matched && !self.is_game_over() && self.turn_owner == Seat::Me
    }

    #[must_use]
    pub fn rolls_left(&self) -> u8 {
        self.rolls_left
    }

    #[must_use]
    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    #[must_use]
    pub fn scorecard(&self, seat: Seat) -> &Scorecard {
        &self.scorecards[seat]
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.end_reason.is_some()
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Every action applied to this session, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Coarse state for display.
    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        if let Some(reason) = self.end_reason {
            TurnState::GameOver(reason)
        } else if !self.matched {
            TurnState::WaitingForMatch
        } else if self.turn_owner == Seat::Me {
            TurnState::MyTurn {
                rolls_left: self.rolls_left,
            }
        } else {
            TurnState::OpponentTurn
        }
    }

    /// Current totals and leader.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        let totals = SeatMap::new(|seat| self.scorecards[seat].total());
        let winner = match totals[Seat::Me].cmp(&totals[Seat::Opponent]) {
            std::cmp::Ordering::Greater => Some(Seat::Me),
            std::cmp::Ordering::Less => Some(Seat::Opponent),
            std::cmp::Ordering::Equal => None,
        };
        Outcome { totals, winner }
    }

    // === Mutation (TurnStateMachine only) ===

    pub(crate) fn begin_match(&mut self, first: Seat) {
        self.matched = true;
        self.turn_owner = first;
        self.reset_turn();
    }

    pub(crate) fn dice_mut(&mut self) -> &mut DiceSet {
        &mut self.dice
    }

    /// Re-roll every unkept die from the session RNG.
    pub(crate) fn roll_unkept(&mut self) {
        let rng = &mut self.rng;
        self.dice.roll_unkept(|| rng.roll_die());
    }

    pub(crate) fn scorecard_mut(&mut self, seat: Seat) -> &mut Scorecard {
        &mut self.scorecards[seat]
    }

    pub(crate) fn set_rolls_left(&mut self, rolls_left: u8) {
        self.rolls_left = rolls_left.min(ROLLS_PER_TURN);
    }

    pub(crate) fn reset_turn(&mut self) {
        self.dice = DiceSet::initial();
        self.rolls_left = ROLLS_PER_TURN;
    }

    /// Hand the turn to the other seat with fresh dice.
    pub(crate) fn pass_turn(&mut self) {
        self.turn_owner = self.turn_owner.other();
        self.turn_number += 1;
        self.action_sequence = 0;
        self.reset_turn();
    }

    pub(crate) fn end(&mut self, reason: EndReason) {
        if self.end_reason.is_none() {
            self.end_reason = Some(reason);
        }
    }

    pub(crate) fn record(&mut self, seat: Seat, action: super::action::Action) {
        let sequence = self.action_sequence;
        self.action_sequence += 1;
        self.history
            .push_back(ActionRecord::new(seat, action, self.turn_number, sequence));
    }
}
