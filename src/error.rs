//! Error taxonomy for session operations.

use crate::game::Mark;
use crate::session::{GameId, GameStatus};
use derive_more::{Display, Error};

/// Stable classification of a [`GameError`], safe to expose to
/// clients without leaking store or lock internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Unknown game id.
    NotFound,
    /// The session exists but is in the wrong state for the request.
    StateConflict,
    /// The move failed one of the legality checks.
    IllegalMove,
    /// Malformed request input.
    Validation,
    /// The store could not complete the operation in time.
    TransientStore,
    /// History persistence failed after the outcome was committed.
    Archival,
}

/// A rejected or failed session operation.
///
/// Every rejection is terminal for the single requesting actor: no
/// stored state is mutated and nothing is broadcast to the opponent.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum GameError {
    /// No session exists under the given id.
    #[display("Game not found: {game_id}")]
    GameNotFound {
        /// The id that failed to resolve.
        game_id: GameId,
    },
    /// Join attempted on a session that is not waiting for players.
    #[display("Game is not waiting for players: {status}")]
    GameNotWaiting {
        /// Status observed at the time of the request.
        status: GameStatus,
    },
    /// Join attempted on a session with both slots occupied.
    #[display("Game is already full")]
    GameFull,
    /// Join attempted by an actor already occupying a slot.
    #[display("You are already in this game as Player {mark}")]
    AlreadyInGame {
        /// The slot the actor already holds.
        mark: Mark,
    },
    /// The move failed one of the five legality checks.
    #[display("Illegal move at ({row}, {col})")]
    IllegalMove {
        /// Requested row.
        row: u16,
        /// Requested column.
        col: u16,
    },
    /// Board dimensions must be positive.
    #[display("Invalid board dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Requested rows.
        rows: u16,
        /// Requested columns.
        cols: u16,
    },
    /// The store lock could not be acquired within the retry budget.
    #[display("Session store unavailable, please retry")]
    TransientStore,
    /// History archival failed after the terminal state committed.
    #[display("Failed to archive game history: {message}")]
    Archival {
        /// Description of the archival failure.
        message: String,
    },
}

impl GameError {
    /// The stable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::GameNotFound { .. } => ErrorKind::NotFound,
            GameError::GameNotWaiting { .. }
            | GameError::GameFull
            | GameError::AlreadyInGame { .. } => ErrorKind::StateConflict,
            GameError::IllegalMove { .. } => ErrorKind::IllegalMove,
            GameError::InvalidDimensions { .. } => ErrorKind::Validation,
            GameError::TransientStore => ErrorKind::TransientStore,
            GameError::Archival { .. } => ErrorKind::Archival,
        }
    }
}
