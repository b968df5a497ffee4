//! Errors raised while building or mutating a game.

use thiserror::Error;

/// Why a position could not be parsed or a move could not be applied.
///
/// Callers that only care about "bad input" can treat every variant the same;
/// the HTTP layer maps all of them to `400 Bad Request`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Invalid UCI move '{0}'")]
    InvalidMove(String),

    #[error("Illegal move '{uci}' in position {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("Game is already over")]
    GameOver,
}
