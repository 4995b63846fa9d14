//! Error types for session operations.

use thiserror::Error;

use super::category::Category;

/// Which operation was attempted, for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Roll,
    Keep,
    Score,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ActionKind::Roll => "roll",
            ActionKind::Keep => "keep",
            ActionKind::Score => "score",
        })
    }
}

/// Errors raised by the turn state machine, the sync protocol and config.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{action} not allowed now: {reason}")]
    InvalidTiming {
        action: ActionKind,
        reason: &'static str,
    },
    #[error("category {0} is already scored")]
    AlreadyScored(Category),
    #[error("die index {0} is out of range")]
    InvalidDieIndex(usize),
    #[error("the game is over")]
    GameOver,
    #[error("connection to the peer was lost")]
    PeerLost,
    #[error("no match has been formed")]
    NoMatch,
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("binary codec error: {0}")]
    Binary(#[from] bincode::Error),
    #[error("relay send failed: {0}")]
    Relay(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl GameError {
    pub(crate) fn timing(action: ActionKind, reason: &'static str) -> Self {
        GameError::InvalidTiming { action, reason }
    }

    /// Check whether this is an out-of-window action the UI should swallow.
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            GameError::InvalidTiming { .. }
                | GameError::AlreadyScored(_)
                | GameError::InvalidDieIndex(_)
                | GameError::GameOver
                | GameError::NoMatch
        )
    }
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GameError::timing(ActionKind::Keep, "no roll yet this turn");
        assert_eq!(err.to_string(), "keep not allowed now: no roll yet this turn");
        assert_eq!(
            GameError::AlreadyScored(Category::FullHouse).to_string(),
            "category full_house is already scored"
        );
    }

    #[test]
    fn test_ignorable_split() {
        assert!(GameError::InvalidDieIndex(7).is_ignorable());
        assert!(GameError::GameOver.is_ignorable());
        assert!(!GameError::PeerLost.is_ignorable());
        assert!(!GameError::Config("x".into()).is_ignorable());
    }
}
