//! Deterministic dice RNG with forking.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical rolls
//! - **Forkable**: The AI opponent rolls from its own branch so its dice never
//!   shift the local player's sequence
//!
//! ```
//! use yacht_duel::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut ai_rng = rng.fork();
//!
//! let mine = rng.roll_die();
//! let theirs = ai_rng.roll_die();
//! assert!((1..=6).contains(&mine.value()));
//! assert!((1..=6).contains(&theirs.value()));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::dice::Face;

/// Deterministic RNG backing every die roll in a session.
///
/// Uses ChaCha8 for speed while keeping rolls uniform over 1..=6.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Roll a single die, uniform over 1..=6.
    pub fn roll_die(&mut self) -> Face {
        Face::clamped(self.inner.gen_range(1..=6))
    }
}
