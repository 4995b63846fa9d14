//! Scoring rules for the twelve categories.
//!
//! Pure functions only. The turn state machine and the AI both call into
//! this module; it never calls back out.

pub mod scoring;

pub use scoring::{
    estimate, is_yacht, score, FULL_HOUSE_SCORE, LARGE_STRAIGHT_SCORE, SMALL_STRAIGHT_SCORE,
    YACHT_SCORE,
};
