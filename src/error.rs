//! Error types for the word match game.

use thiserror::Error;

use crate::deck::CardId;
use crate::words::Difficulty;

/// Result type alias using GameError.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors raised by the game core and its browser glue.
#[derive(Clone, Debug, Error)]
pub enum GameError {
    #[error("word list for {difficulty} unavailable: {reason}")]
    DataUnavailable {
        difficulty: Difficulty,
        reason: String,
    },

    #[error("card {0} is not part of the current deck")]
    InvalidSelection(CardId),

    #[error("audio playback failed: {0}")]
    Audio(String),

    #[error("browser api unavailable: {0}")]
    Dom(String),
}

impl GameError {
    pub(crate) fn unavailable(difficulty: Difficulty, reason: impl Into<String>) -> Self {
        GameError::DataUnavailable {
            difficulty,
            reason: reason.into(),
        }
    }
}
