//! # yacht-duel
//!
//! Core of a two-player Yacht dice game kept in sync over a thin relay, with
//! a heuristic AI opponent for single-player games.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: each client's `GameSession` is owned by its
//!    `GameController`. The two clients never share state; they converge by
//!    exchanging actions.
//!
//! 2. **Trust the Peer**: peer actions are applied as received. Sequence
//!    numbers detect desyncs but nothing is re-validated or rolled back.
//!
//! 3. **No Blocking**: AI pacing and the yacht celebration are scheduled
//!    events on a virtual clock. Tests run them instantly.
//!
//! ## Modules
//!
//! - `core`: dice, categories, scorecards, actions, session state, RNG,
//!   configuration, errors
//! - `rules`: the scoring engine
//! - `turn`: the turn state machine and the timer queue
//! - `sync`: wire codec, relay transport and the sync protocol
//! - `ai`: the heuristic opponent
//! - `render`: the display sink contract
//! - `controller`: the event loop tying everything together
//!
//! ## Example
//!
//! ```rust
//! use yacht_duel::{GameConfig, GameController, HeuristicPolicy, NullRenderer};
//!
//! let mut game = GameController::single_player(GameConfig::instant(42), NullRenderer).unwrap();
//! while !game.is_game_over() {
//!     game.autoplay_turn(&HeuristicPolicy);
//!     game.run_until_idle();
//! }
//! println!("{:?}", game.session().outcome());
//! ```

pub mod ai;
pub mod controller;
pub mod core;
pub mod render;
pub mod rules;
pub mod sync;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Category, DiceSet, Die, Face, GameConfig, GameError, GameRng,
    GameSession, Mode, Outcome, Result, Scorecard, Seat, SeatMap, TurnState, WireFormat,
};

pub use crate::rules::{estimate, score};

pub use crate::turn::{Scheduler, TimerEvent, TurnStateMachine};

pub use crate::sync::{ChannelRelay, Envelope, Lobby, MatchStatus, PeerId, Relay, RelayEvent, SyncProtocol};

pub use crate::ai::{AiOpponent, HeuristicPolicy, TurnPolicy};

pub use crate::render::{Notice, NullRenderer, RecordingRenderer, Renderer};

pub use crate::controller::{ControllerEvent, GameController};
