//! Outbound event payloads emitted by the orchestrator.

use crate::game::{Board, Cell, Mark};
use crate::session::{ActorId, GameId, GameStatus, Session};
use serde::{Deserialize, Serialize};

/// Which participant holds each slot. Either side may still be empty
/// while the session is waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignments {
    /// Occupant of the X slot.
    pub x: Option<ActorId>,
    /// Occupant of the O slot.
    pub o: Option<ActorId>,
}

impl SlotAssignments {
    /// Snapshot of a session's slot occupancy.
    pub fn of(session: &Session) -> Self {
        Self {
            x: session.slot_x().clone(),
            o: session.slot_o().clone(),
        }
    }
}

/// Structured snapshot of board occupancy, sorted for determinism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Cells occupied by X, in row-major order.
    pub x: Vec<Cell>,
    /// Cells occupied by O, in row-major order.
    pub o: Vec<Cell>,
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        Self {
            x: board.positions_of(Mark::X).iter().copied().collect(),
            o: board.positions_of(Mark::O).iter().copied().collect(),
        }
    }
}

/// Events delivered to participants through the [`Notifier`].
///
/// [`Notifier`]: crate::collaborators::Notifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A session was created and is waiting for an opponent. Sent to
    /// the creator only.
    SessionCreated {
        /// Session id to share with the opponent.
        game_id: GameId,
        /// Slot occupancy (exactly one side filled).
        slots: SlotAssignments,
        /// Always `Waiting`.
        status: GameStatus,
        /// Board height.
        rows: u16,
        /// Board width.
        cols: u16,
    },
    /// The second participant joined and play began. Sent to both
    /// participants.
    SessionStarted {
        /// Session id.
        game_id: GameId,
        /// Slot occupancy (both sides filled).
        slots: SlotAssignments,
        /// The X-slot participant, who moves first.
        turn: ActorId,
        /// Always `InProgress`.
        status: GameStatus,
        /// Board height.
        rows: u16,
        /// Board width.
        cols: u16,
    },
    /// A legal move was applied. Sent to both participants.
    MoveApplied {
        /// Session id.
        game_id: GameId,
        /// The participant who moved.
        actor_id: ActorId,
        /// Row of the move.
        row: u16,
        /// Column of the move.
        col: u16,
        /// Status after the move.
        status: GameStatus,
        /// Winner's id when the move ended the game with a win.
        winner_id: Option<ActorId>,
        /// Next participant to move when the game continues.
        next_turn: Option<ActorId>,
        /// Board occupancy after the move.
        board: BoardSnapshot,
    },
}

impl GameEvent {
    /// The session this event belongs to.
    pub fn game_id(&self) -> &GameId {
        match self {
            GameEvent::SessionCreated { game_id, .. }
            | GameEvent::SessionStarted { game_id, .. }
            | GameEvent::MoveApplied { game_id, .. } => game_id,
        }
    }
}
