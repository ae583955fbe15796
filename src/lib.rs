//! Gridmatch - concurrent two-player grid-game session engine.
//!
//! Matches two remote players into a shared session, serializes their
//! moves into a consistent board state on a generalized M×N grid, and
//! determines terminal outcomes (win length fixed at 3). Transport,
//! identity resolution, and durable history storage are abstract
//! collaborators supplied by the embedder.
//!
//! # Architecture
//!
//! - **Game**: pure board and rule evaluation (no I/O, no state)
//! - **Store**: keyed session storage with TTL retention and an
//!   atomic per-key update primitive
//! - **Orchestrator**: the create/join/move/terminate state machine
//! - **Collaborators**: notification and archival seams
//!
//! # Example
//!
//! ```no_run
//! use gridmatch::{CreateOrJoinRequest, SessionOrchestrator};
//!
//! # async fn example(
//! #     notifier: impl gridmatch::Notifier,
//! #     archiver: impl gridmatch::HistoryArchiver,
//! # ) -> Result<(), gridmatch::GameError> {
//! let orchestrator = SessionOrchestrator::new(notifier, archiver);
//! let request = CreateOrJoinRequest { game_id: None, rows: 3, cols: 3 };
//! let created = orchestrator.create_or_join(&request, &"alice".to_string()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod collaborators;
mod config;
mod error;
mod events;
mod game;
mod history;
mod orchestrator;
mod session;
mod store;

// Crate-level exports - Game rules
pub use game::{Board, Cell, Mark, WIN_LENGTH, apply_move, is_draw, is_legal_move, winner};

// Crate-level exports - Session record
pub use session::{ActorId, GameId, GameStatus, Session};

// Crate-level exports - Storage
pub use store::{Disposition, SessionStore};

// Crate-level exports - Orchestration
pub use orchestrator::{CreateOrJoinRequest, MakeMoveRequest, SessionOrchestrator};

// Crate-level exports - Events and history
pub use events::{BoardSnapshot, GameEvent, SlotAssignments};
pub use history::HistoryRecord;

// Crate-level exports - Collaborator contracts
pub use collaborators::{ArchivalError, HistoryArchiver, IdentityResolver, Notifier, NotifyError};

// Crate-level exports - Errors and configuration
pub use config::EngineConfig;
pub use error::{ErrorKind, GameError};
