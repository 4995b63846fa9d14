//! Core session types: dice, categories, scorecards, seats, actions, RNG,
//! configuration, errors.
//!
//! Everything here is plain data. Rules live in `rules`, turn flow in `turn`.

pub mod action;
pub mod category;
pub mod config;
pub mod dice;
pub mod error;
pub mod rng;
pub mod scorecard;
pub mod seat;
pub mod state;

pub use action::{Action, ActionRecord};
pub use category::{Category, UnknownCategory, CATEGORY_COUNT};
pub use config::{GameConfig, WireFormat};
pub use dice::{DiceSet, Die, Face, InvalidFace, DICE_COUNT};
pub use error::{ActionKind, GameError, Result};
pub use rng::GameRng;
pub use scorecard::{Scorecard, UPPER_BONUS, UPPER_BONUS_THRESHOLD};
pub use seat::{Seat, SeatMap};
pub use state::{EndReason, GameSession, Mode, Outcome, TurnState, ROLLS_PER_TURN};
