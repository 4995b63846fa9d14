//! Heuristic AI opponent for single-player mode.
//!
//! ## Overview
//!
//! - `policy`: the keep/score heuristic behind a `TurnPolicy` trait
//! - `opponent`: a stepwise turn driver that emits peer-style actions
//!
//! ## Usage
//!
//! ```rust
//! use yacht_duel::ai::AiOpponent;
//! use yacht_duel::core::{GameRng, Scorecard};
//!
//! let mut ai = AiOpponent::new(GameRng::new(7));
//! let card = Scorecard::new();
//!
//! ai.begin_turn();
//! while let Some(step) = ai.step(&card) {
//!     // apply step.actions to the session, then schedule the next step
//!     if step.done {
//!         break;
//!     }
//! }
//! ```

pub mod opponent;
pub mod policy;

pub use opponent::{AiOpponent, AiPhase, AiStep};
pub use policy::{decide_keep, decide_score, HeuristicPolicy, KeepSet, TurnPolicy};
