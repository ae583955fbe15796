//! Abstract collaborator contracts consumed by the core.
//!
//! Transport, identity, and durable storage live outside this crate;
//! the orchestrator only constructs events and records and hands
//! them to these traits. No wire format is prescribed.

use crate::events::GameEvent;
use crate::history::HistoryRecord;
use crate::session::{ActorId, GameId};
use async_trait::async_trait;
use derive_more::{Display, Error};

/// Delivery failure reported by a [`Notifier`].
///
/// Delivery is at-least-once on the transport side; the core does not
/// retry, it only logs the failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Notification delivery failed: {message}")]
pub struct NotifyError {
    /// Description of the delivery failure.
    pub message: String,
}

impl NotifyError {
    /// Creates a delivery error.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Archival failure reported by a [`HistoryArchiver`].
///
/// Non-fatal to the already-committed game outcome; surfaced for
/// operational visibility and possibly retried by the collaborator.
#[derive(Debug, Clone, Display, Error)]
#[display("History archival failed: {message}")]
pub struct ArchivalError {
    /// Description of the archival failure.
    pub message: String,
}

impl ArchivalError {
    /// Creates an archival error.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<ArchivalError> for crate::error::GameError {
    fn from(err: ArchivalError) -> Self {
        crate::error::GameError::Archival { message: err.message }
    }
}

/// Maps a connection token to a durable participant id.
///
/// The core treats the resolved id as an opaque, stable string for
/// the session's duration; resolution itself belongs to the caller's
/// command layer.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves a connection token, or `None` for unknown tokens.
    async fn resolve_actor(&self, connection_token: &str) -> Option<ActorId>;
}

/// Delivers outbound events to connected clients.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers an event to a single participant.
    async fn notify_actor(&self, actor: &ActorId, event: &GameEvent) -> Result<(), NotifyError>;

    /// Delivers an event to every participant of a session.
    async fn notify_session(&self, game_id: &GameId, event: &GameEvent)
    -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn notify_actor(&self, actor: &ActorId, event: &GameEvent) -> Result<(), NotifyError> {
        (**self).notify_actor(actor, event).await
    }

    async fn notify_session(
        &self,
        game_id: &GameId,
        event: &GameEvent,
    ) -> Result<(), NotifyError> {
        (**self).notify_session(game_id, event).await
    }
}

/// Durable storage for completed-game records.
#[async_trait]
pub trait HistoryArchiver: Send + Sync {
    /// Persists the record. Must be idempotent per game id on the
    /// collaborator side if it retries internally.
    async fn archive(&self, record: HistoryRecord) -> Result<(), ArchivalError>;
}

#[async_trait]
impl<T: HistoryArchiver + ?Sized> HistoryArchiver for std::sync::Arc<T> {
    async fn archive(&self, record: HistoryRecord) -> Result<(), ArchivalError> {
        (**self).archive(record).await
    }
}
