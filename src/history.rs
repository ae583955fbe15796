//! Immutable record of a completed session, handed to the archiver.

use crate::events::BoardSnapshot;
use crate::session::{ActorId, GameId, GameStatus, Session};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Append-only outcome record, produced exactly once per session.
///
/// Owned by the archival collaborator once emitted; the core never
/// reads it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct HistoryRecord {
    /// Id of the completed session.
    game_id: GameId,
    /// Participant who held the X slot.
    actor_x: Option<ActorId>,
    /// Participant who held the O slot.
    actor_o: Option<ActorId>,
    /// Terminal status of the session.
    #[getter(copy)]
    final_status: GameStatus,
    /// Board height.
    #[getter(copy)]
    rows: u16,
    /// Board width.
    #[getter(copy)]
    cols: u16,
    /// Final board occupancy.
    final_board: BoardSnapshot,
    /// Winner's id, empty for a draw.
    winner_id: Option<ActorId>,
    /// When the session reached its terminal status.
    #[getter(copy)]
    completed_at: DateTime<Utc>,
    /// Wall-clock game length in milliseconds.
    #[getter(copy)]
    duration_ms: i64,
}

impl HistoryRecord {
    /// Builds the record from a session that just reached a terminal
    /// status.
    pub fn from_session(session: &Session, completed_at: DateTime<Utc>) -> Self {
        let winner_id = session
            .status()
            .winning_mark()
            .and_then(|mark| session.actor_for(mark).cloned());
        Self::new(
            session.game_id().clone(),
            session.slot_x().clone(),
            session.slot_o().clone(),
            session.status(),
            session.rows(),
            session.cols(),
            BoardSnapshot::from(session.board()),
            winner_id,
            completed_at,
            (completed_at - session.created_at()).num_milliseconds(),
        )
    }
}
