//! The state machine driving create/join/move transitions.
//!
//! Every transition runs its read-modify-write span inside the
//! store's exclusive [`mutate`] primitive, then performs notification
//! and archival side effects after exclusion is released. Rejections
//! are reported to the requesting actor only and never mutate state.
//!
//! [`mutate`]: crate::store::SessionStore::mutate

use crate::collaborators::{HistoryArchiver, Notifier};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::events::{BoardSnapshot, GameEvent, SlotAssignments};
use crate::game::{self, Cell, Mark};
use crate::history::HistoryRecord;
use crate::session::{ActorId, GameId, GameStatus, Session};
use crate::store::{Disposition, SessionStore};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Request to create a session or join an existing one.
///
/// An absent or blank `game_id` creates a new session; otherwise the
/// actor joins the session under that id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrJoinRequest {
    /// Session to join, or empty to create one.
    pub game_id: Option<GameId>,
    /// Board height for a new session.
    pub rows: u16,
    /// Board width for a new session.
    pub cols: u16,
}

/// Request to place a mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeMoveRequest {
    /// Session to move in.
    pub game_id: GameId,
    /// Row of the move.
    pub row: u16,
    /// Column of the move.
    pub col: u16,
}

/// Drives session transitions against the store and emits events and
/// history records through the collaborator traits.
#[derive(Debug)]
pub struct SessionOrchestrator<N, A> {
    store: SessionStore,
    notifier: N,
    archiver: A,
    config: EngineConfig,
}

impl<N: Notifier, A: HistoryArchiver> SessionOrchestrator<N, A> {
    /// Creates an orchestrator with the default configuration.
    pub fn new(notifier: N, archiver: A) -> Self {
        Self::with_config(notifier, archiver, EngineConfig::default())
    }

    /// Creates an orchestrator with an explicit configuration.
    #[instrument(skip(notifier, archiver))]
    pub fn with_config(notifier: N, archiver: A, config: EngineConfig) -> Self {
        info!("creating session orchestrator");
        Self {
            store: SessionStore::new(&config),
            notifier,
            archiver,
            config,
        }
    }

    /// The underlying store, for retention sweeps and inspection.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Creates a new waiting session or joins an existing one.
    #[instrument(skip(self, req), fields(actor = %actor))]
    pub async fn create_or_join(
        &self,
        req: &CreateOrJoinRequest,
        actor: &ActorId,
    ) -> Result<GameEvent, GameError> {
        match req.game_id.as_deref().map(str::trim) {
            None | Some("") => self.create_session(req.rows, req.cols, actor).await,
            Some(game_id) => self.join_session(game_id, actor).await,
        }
    }

    /// Creates a session in `Waiting` with the creator on a uniformly
    /// random slot, and notifies the creator only.
    #[instrument(skip(self), fields(actor = %actor))]
    async fn create_session(
        &self,
        rows: u16,
        cols: u16,
        actor: &ActorId,
    ) -> Result<GameEvent, GameError> {
        if rows == 0 || cols == 0 {
            warn!(rows, cols, "rejecting non-positive board dimensions");
            return Err(GameError::InvalidDimensions { rows, cols });
        }

        let creator_mark = if rand::thread_rng().gen_bool(0.5) {
            Mark::X
        } else {
            Mark::O
        };
        let game_id: GameId = Uuid::new_v4().to_string();
        let session = Session::new(
            game_id.clone(),
            rows,
            cols,
            actor.clone(),
            creator_mark,
            Utc::now(),
        );
        let event = GameEvent::SessionCreated {
            game_id: game_id.clone(),
            slots: SlotAssignments::of(&session),
            status: session.status(),
            rows,
            cols,
        };

        self.with_retries(|| self.store.insert(session.clone())).await?;
        info!(game_id = %game_id, mark = %creator_mark, "session created, waiting for opponent");

        if let Err(e) = self.notifier.notify_actor(actor, &event).await {
            warn!(game_id = %game_id, actor = %actor, error = %e, "creation notification failed");
        }
        Ok(event)
    }

    /// Fills the empty slot of a waiting session and starts play with
    /// the X-slot participant to move first.
    #[instrument(skip(self), fields(actor = %actor))]
    async fn join_session(&self, game_id: &str, actor: &ActorId) -> Result<GameEvent, GameError> {
        let event = self
            .with_retries(|| {
                self.store.mutate(game_id, |session| {
                    if session.status() != GameStatus::Waiting {
                        return Err(GameError::GameNotWaiting { status: session.status() });
                    }
                    if session.is_full() {
                        return Err(GameError::GameFull);
                    }
                    if let Some(mark) = session.mark_of(actor) {
                        return Err(GameError::AlreadyInGame { mark });
                    }
                    let open = session.empty_slot().ok_or(GameError::GameFull)?;

                    // X always moves first once both slots are filled,
                    // regardless of who created the session.
                    let first = if open == Mark::X {
                        actor.clone()
                    } else if let Some(holder) = session.actor_for(Mark::X) {
                        holder.clone()
                    } else {
                        // A stored session always has at least one occupant.
                        return Err(GameError::GameFull);
                    };

                    session.assign_slot(open, actor.clone());
                    session.set_status(GameStatus::InProgress);
                    session.set_turn(Some(first.clone()));

                    let event = GameEvent::SessionStarted {
                        game_id: session.game_id().clone(),
                        slots: SlotAssignments::of(session),
                        turn: first,
                        status: session.status(),
                        rows: session.rows(),
                        cols: session.cols(),
                    };
                    Ok((event, Disposition::Keep))
                })
            })
            .await?;

        info!(game_id, actor = %actor, "session started");
        if let Err(e) = self.notifier.notify_session(&game_id.to_string(), &event).await {
            warn!(game_id, error = %e, "start notification failed");
        }
        Ok(event)
    }

    /// Applies a move, evaluates win then draw, and on a terminal
    /// outcome archives history exactly once and removes the session.
    #[instrument(skip(self, req), fields(game_id = %req.game_id, actor = %actor))]
    pub async fn make_move(
        &self,
        req: &MakeMoveRequest,
        actor: &ActorId,
    ) -> Result<GameEvent, GameError> {
        let cell = Cell::new(req.row, req.col);
        let (event, record) = self
            .with_retries(|| {
                self.store.mutate(&req.game_id, |session| {
                    if !game::is_legal_move(session, actor, cell) {
                        debug!(row = cell.row, col = cell.col, "move rejected");
                        return Err(GameError::IllegalMove { row: cell.row, col: cell.col });
                    }
                    game::apply_move(session, actor, cell);

                    if let Some(mark) = game::winner(session, cell) {
                        session.set_status(GameStatus::won_by(mark));
                        let record = session
                            .mark_archived()
                            .then(|| HistoryRecord::from_session(session, Utc::now()));
                        let event = move_applied(session, actor, cell, None);
                        return Ok(((event, record), Disposition::Remove));
                    }
                    if game::is_draw(session) {
                        session.set_status(GameStatus::Draw);
                        let record = session
                            .mark_archived()
                            .then(|| HistoryRecord::from_session(session, Utc::now()));
                        let event = move_applied(session, actor, cell, None);
                        return Ok(((event, record), Disposition::Remove));
                    }

                    let next_turn = session.turn().clone();
                    let event = move_applied(session, actor, cell, next_turn);
                    Ok(((event, None), Disposition::Keep))
                })
            })
            .await?;

        info!(game_id = %req.game_id, row = cell.row, col = cell.col, "move applied");
        if let Err(e) = self.notifier.notify_session(&req.game_id, &event).await {
            warn!(game_id = %req.game_id, error = %e, "move notification failed");
        }
        if let Some(record) = record {
            if let Err(e) = self.archiver.archive(record).await {
                // The outcome and notifications already committed; the
                // archival collaborator may retry on its side.
                warn!(game_id = %req.game_id, error = %e, "history archival failed");
            }
        }
        Ok(event)
    }

    /// Runs a store operation, retrying transient failures a bounded
    /// number of times with a short backoff.
    async fn with_retries<T>(
        &self,
        mut op: impl FnMut() -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut attempt = 0;
        loop {
            match op() {
                Err(GameError::TransientStore) if attempt < self.config.store_retry_budget => {
                    attempt += 1;
                    warn!(attempt, budget = self.config.store_retry_budget, "transient store failure, retrying");
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                result => return result,
            }
        }
    }
}

/// Builds the `MoveApplied` payload from the post-move session state.
fn move_applied(
    session: &Session,
    actor: &ActorId,
    cell: Cell,
    next_turn: Option<ActorId>,
) -> GameEvent {
    let winner_id = session
        .status()
        .winning_mark()
        .and_then(|mark| session.actor_for(mark).cloned());
    GameEvent::MoveApplied {
        game_id: session.game_id().clone(),
        actor_id: actor.clone(),
        row: cell.row,
        col: cell.col,
        status: session.status(),
        winner_id,
        next_turn,
        board: BoardSnapshot::from(session.board()),
    }
}
