//! Action representation: the three moves a player can make.
//!
//! Actions are what travels between the two clients. On the wire each one is
//! a `{type, payload}` record, so a roll looks like
//! `{"type":"roll","payload":{"dice":[3,3,5,1,6]}}`.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::dice::{Face, DICE_COUNT};
use super::seat::Seat;

/// A game action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// The dice after a roll.
    Roll { dice: [Face; DICE_COUNT] },

    /// A die's kept flag after a toggle.
    ///
    /// Carries the resulting flag instead of "toggle" so that a duplicated
    /// message is harmless.
    Keep { index: usize, kept: bool },

    /// A committed category and the score written for it.
    Score { category: Category, score: u32 },
}

impl Action {
    /// Short name, matching the wire `type` field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Roll { .. } => "roll",
            Action::Keep { .. } => "keep",
            Action::Score { .. } => "score",
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that took this action.
    pub seat: Seat,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(seat: Seat, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            seat,
            action,
            turn,
            sequence,
        }
    }
}
