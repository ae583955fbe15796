//! The session record: one live game between at most two participants.

use crate::game::{Board, Mark};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Unique identifier for a game session.
pub type GameId = String;

/// Opaque, stable identifier for a participant.
pub type ActorId = String;

/// Lifecycle status of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Created, waiting for a second participant.
    Waiting,
    /// Both slots filled, moves are being played.
    InProgress,
    /// Terminal: the X-slot participant won.
    XWon,
    /// Terminal: the O-slot participant won.
    OWon,
    /// Terminal: board filled with no winner.
    Draw,
    /// Terminal: session was cancelled.
    Cancelled,
}

impl GameStatus {
    /// Returns true for statuses from which no further moves are possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::XWon | GameStatus::OWon | GameStatus::Draw | GameStatus::Cancelled
        )
    }

    /// The terminal status for a win by the given mark.
    pub fn won_by(mark: Mark) -> Self {
        match mark {
            Mark::X => GameStatus::XWon,
            Mark::O => GameStatus::OWon,
        }
    }

    /// The winning mark, if this is a won status.
    pub fn winning_mark(self) -> Option<Mark> {
        match self {
            GameStatus::XWon => Some(Mark::X),
            GameStatus::OWon => Some(Mark::O),
            _ => None,
        }
    }
}

/// Mutable state of one live game.
///
/// At most one participant per slot; a participant keeps its slot for
/// the session's lifetime. `turn` is informational while `Waiting`
/// and is fixed to the X-slot participant when the second slot fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Session {
    /// Unique id, assigned at creation.
    game_id: GameId,
    /// Board height, fixed at creation.
    #[getter(copy)]
    rows: u16,
    /// Board width, fixed at creation.
    #[getter(copy)]
    cols: u16,
    /// Participant holding the X slot.
    slot_x: Option<ActorId>,
    /// Participant holding the O slot.
    slot_o: Option<ActorId>,
    /// Participant whose move is currently legal.
    turn: Option<ActorId>,
    /// Cell occupancy by mark.
    board: Board,
    /// Lifecycle status.
    #[getter(copy)]
    status: GameStatus,
    /// Set once the terminal archival side effect has been handed off.
    #[getter(copy)]
    history_archived: bool,
    /// Creation timestamp.
    #[getter(copy)]
    created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    #[getter(copy)]
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session in `Waiting` with the creator occupying the
    /// given slot and recorded as the current turn holder.
    pub fn new(
        game_id: GameId,
        rows: u16,
        cols: u16,
        creator: ActorId,
        creator_mark: Mark,
        now: DateTime<Utc>,
    ) -> Self {
        let (slot_x, slot_o) = match creator_mark {
            Mark::X => (Some(creator.clone()), None),
            Mark::O => (None, Some(creator.clone())),
        };
        Self {
            game_id,
            rows,
            cols,
            slot_x,
            slot_o,
            turn: Some(creator),
            board: Board::new(),
            status: GameStatus::Waiting,
            history_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The mark of the slot the actor occupies, if any.
    pub fn mark_of(&self, actor: &str) -> Option<Mark> {
        if self.slot_x.as_deref() == Some(actor) {
            Some(Mark::X)
        } else if self.slot_o.as_deref() == Some(actor) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The participant occupying the slot for the given mark.
    pub fn actor_for(&self, mark: Mark) -> Option<&ActorId> {
        match mark {
            Mark::X => self.slot_x.as_ref(),
            Mark::O => self.slot_o.as_ref(),
        }
    }

    /// The single unoccupied slot, if one exists.
    pub fn empty_slot(&self) -> Option<Mark> {
        if self.slot_x.is_none() {
            Some(Mark::X)
        } else if self.slot_o.is_none() {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Returns true once both slots are occupied.
    pub fn is_full(&self) -> bool {
        self.slot_x.is_some() && self.slot_o.is_some()
    }

    /// All current participants, X slot first.
    pub fn participants(&self) -> impl Iterator<Item = &ActorId> {
        self.slot_x.iter().chain(self.slot_o.iter())
    }

    /// Assigns the actor to the slot for the given mark.
    pub fn assign_slot(&mut self, mark: Mark, actor: ActorId) {
        match mark {
            Mark::X => self.slot_x = Some(actor),
            Mark::O => self.slot_o = Some(actor),
        }
    }

    /// Sets the turn holder.
    pub fn set_turn(&mut self, actor: Option<ActorId>) {
        self.turn = actor;
    }

    /// Sets the lifecycle status.
    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Marks history as archived. Returns true if this call performed
    /// the transition, false if it had already been marked.
    pub fn mark_archived(&mut self) -> bool {
        if self.history_archived {
            return false;
        }
        self.history_archived = true;
        true
    }

    /// Mutable access to the board.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Refreshes the last-mutation timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(creator_mark: Mark) -> Session {
        Session::new(
            "g1".to_string(),
            3,
            3,
            "alice".to_string(),
            creator_mark,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_session_is_waiting_with_one_slot() {
        let session = session_with(Mark::O);
        assert_eq!(session.status(), GameStatus::Waiting);
        assert_eq!(session.mark_of("alice"), Some(Mark::O));
        assert_eq!(session.empty_slot(), Some(Mark::X));
        assert!(!session.is_full());
        assert_eq!(session.turn().as_deref(), Some("alice"));
    }

    #[test]
    fn test_assign_slot_fills_session() {
        let mut session = session_with(Mark::X);
        session.assign_slot(Mark::O, "bob".to_string());
        assert!(session.is_full());
        assert_eq!(session.empty_slot(), None);
        assert_eq!(session.actor_for(Mark::O).map(String::as_str), Some("bob"));
        let participants: Vec<_> = session.participants().map(String::as_str).collect();
        assert_eq!(participants, vec!["alice", "bob"]);
    }

    #[test]
    fn test_mark_archived_is_one_shot() {
        let mut session = session_with(Mark::X);
        assert!(session.mark_archived());
        assert!(!session.mark_archived());
        assert!(session.history_archived());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(GameStatus::XWon.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
        assert!(GameStatus::Cancelled.is_terminal());
        assert!(!GameStatus::Waiting.is_terminal());
        assert!(!GameStatus::InProgress.is_terminal());
        assert_eq!(GameStatus::won_by(Mark::O), GameStatus::OWon);
        assert_eq!(GameStatus::OWon.winning_mark(), Some(Mark::O));
    }
}
