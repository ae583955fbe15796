//! Keyed session storage with TTL retention and atomic updates.
//!
//! The store owns the only shared mutable resource in the core. Its
//! [`SessionStore::mutate`] primitive holds exclusion for the whole
//! read-modify-write span of a transition, which is what serializes
//! concurrent joins and moves on the same key.

use crate::config::EngineConfig;
use crate::error::GameError;
use crate::session::{GameId, Session};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// What to do with the entry after a successful [`SessionStore::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Persist the mutated session and refresh its retention deadline.
    Keep,
    /// Delete the entry (terminal transitions).
    Remove,
}

#[derive(Debug)]
struct Entry {
    session: Session,
    expires_at: Instant,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-memory keyed storage of session records.
///
/// Entries idle longer than the configured TTL are reclaimed, either
/// lazily on access or by an explicit [`cleanup_expired`] sweep; both
/// paths are safe to race with the orchestrator's explicit deletion.
///
/// [`cleanup_expired`]: SessionStore::cleanup_expired
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<GameId, Entry>>>,
    ttl: Duration,
    lock_retry_budget: u32,
}

impl SessionStore {
    /// Creates an empty store with the config's TTL and lock budget.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl: config.session_ttl,
            lock_retry_budget: config.lock_retry_budget,
        }
    }

    /// Acquires the map lock within a bounded number of attempts.
    ///
    /// Surfaces `TransientStore` instead of blocking indefinitely, so
    /// no store operation can hang a request forever.
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<GameId, Entry>>, GameError> {
        for _ in 0..self.lock_retry_budget {
            match self.inner.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => std::thread::yield_now(),
                Err(TryLockError::Poisoned(_)) => {
                    warn!("session store lock poisoned");
                    return Err(GameError::TransientStore);
                }
            }
        }
        warn!(budget = self.lock_retry_budget, "session store lock retry budget exhausted");
        Err(GameError::TransientStore)
    }

    /// Inserts a new session record.
    #[instrument(skip(self, session), fields(game_id = %session.game_id()))]
    pub fn insert(&self, session: Session) -> Result<(), GameError> {
        let mut map = self.guard()?;
        let game_id = session.game_id().clone();
        map.insert(
            game_id.clone(),
            Entry { session, expires_at: Instant::now() + self.ttl },
        );
        debug!(game_id = %game_id, "session stored");
        Ok(())
    }

    /// Returns a snapshot of the session, or `None` if it is absent
    /// or its retention deadline has passed.
    #[instrument(skip(self))]
    pub fn get(&self, game_id: &str) -> Result<Option<Session>, GameError> {
        let mut map = self.guard()?;
        let now = Instant::now();
        if map.get(game_id).is_some_and(|entry| entry.expired(now)) {
            debug!(game_id, "evicting expired session on read");
            map.remove(game_id);
            return Ok(None);
        }
        Ok(map.get(game_id).map(|entry| entry.session.clone()))
    }

    /// Atomically applies `f` to the stored session.
    ///
    /// Exclusion is held for the entire closure, so at most one
    /// mutation per key is in flight at any time. The closure runs on
    /// a working copy: on `Err` the stored record is untouched, which
    /// is what makes rejections side-effect free. On `Ok` the copy is
    /// committed with a fresh `updated_at` (or the entry is removed
    /// when the closure asks for [`Disposition::Remove`]).
    #[instrument(skip(self, f))]
    pub fn mutate<T>(
        &self,
        game_id: &str,
        f: impl FnOnce(&mut Session) -> Result<(T, Disposition), GameError>,
    ) -> Result<T, GameError> {
        let mut map = self.guard()?;
        let now = Instant::now();
        if map.get(game_id).is_some_and(|entry| entry.expired(now)) {
            debug!(game_id, "evicting expired session on mutate");
            map.remove(game_id);
        }
        let entry = map.get_mut(game_id).ok_or_else(|| GameError::GameNotFound {
            game_id: game_id.to_string(),
        })?;

        let mut working = entry.session.clone();
        let (value, disposition) = f(&mut working)?;
        match disposition {
            Disposition::Keep => {
                working.touch(chrono::Utc::now());
                entry.session = working;
                entry.expires_at = now + self.ttl;
            }
            Disposition::Remove => {
                map.remove(game_id);
                debug!(game_id, "session removed");
            }
        }
        Ok(value)
    }

    /// Deletes a session. Removing an absent or already-expired key
    /// is a no-op; returns whether an entry was actually deleted.
    #[instrument(skip(self))]
    pub fn remove(&self, game_id: &str) -> Result<bool, GameError> {
        let mut map = self.guard()?;
        Ok(map.remove(game_id).is_some())
    }

    /// Sweeps every expired entry. Returns the number reclaimed.
    #[instrument(skip(self))]
    pub fn cleanup_expired(&self) -> Result<usize, GameError> {
        let mut map = self.guard()?;
        let now = Instant::now();
        let before = map.len();
        map.retain(|_, entry| !entry.expired(now));
        let reclaimed = before - map.len();
        if reclaimed > 0 {
            debug!(reclaimed, "expired sessions reclaimed");
        }
        Ok(reclaimed)
    }

    /// Ids of all live sessions.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Result<Vec<GameId>, GameError> {
        let now = Instant::now();
        let map = self.guard()?;
        Ok(map
            .iter()
            .filter(|(_, entry)| !entry.expired(now))
            .map(|(id, _)| id.clone())
            .collect())
    }

    /// Number of stored entries, including not-yet-swept expired ones.
    pub fn len(&self) -> Result<usize, GameError> {
        Ok(self.guard()?.len())
    }

    /// Returns true when no entries are stored.
    pub fn is_empty(&self) -> Result<bool, GameError> {
        Ok(self.guard()?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Mark;
    use crate::session::GameStatus;
    use chrono::Utc;

    fn store_with_ttl(ttl: Duration) -> SessionStore {
        let config = EngineConfig { session_ttl: ttl, ..EngineConfig::default() };
        SessionStore::new(&config)
    }

    fn waiting_session(id: &str) -> Session {
        Session::new(id.to_string(), 3, 3, "alice".to_string(), Mark::X, Utc::now())
    }

    #[test]
    fn test_insert_get_roundtrip() {
        let store = store_with_ttl(Duration::from_secs(60));
        store.insert(waiting_session("g1")).unwrap();
        let session = store.get("g1").unwrap().unwrap();
        assert_eq!(session.game_id(), "g1");
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_mutate_commits_only_on_ok() {
        let store = store_with_ttl(Duration::from_secs(60));
        store.insert(waiting_session("g1")).unwrap();

        let err = store
            .mutate("g1", |session| {
                session.set_status(GameStatus::InProgress);
                Err::<((), Disposition), _>(GameError::GameFull)
            })
            .unwrap_err();
        assert_eq!(err, GameError::GameFull);
        assert_eq!(store.get("g1").unwrap().unwrap().status(), GameStatus::Waiting);

        store
            .mutate("g1", |session| {
                session.set_status(GameStatus::InProgress);
                Ok(((), Disposition::Keep))
            })
            .unwrap();
        assert_eq!(
            store.get("g1").unwrap().unwrap().status(),
            GameStatus::InProgress
        );
    }

    #[test]
    fn test_mutate_remove_deletes_entry() {
        let store = store_with_ttl(Duration::from_secs(60));
        store.insert(waiting_session("g1")).unwrap();
        store
            .mutate("g1", |_| Ok(((), Disposition::Remove)))
            .unwrap();
        assert!(store.get("g1").unwrap().is_none());
    }

    #[test]
    fn test_mutate_unknown_key_is_not_found() {
        let store = store_with_ttl(Duration::from_secs(60));
        let err = store
            .mutate("nope", |_| Ok(((), Disposition::Keep)))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NotFound);
    }

    #[test]
    fn test_expired_entries_are_reclaimed() {
        let store = store_with_ttl(Duration::from_millis(10));
        store.insert(waiting_session("g1")).unwrap();
        store.insert(waiting_session("g2")).unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert!(store.get("g1").unwrap().is_none());
        assert_eq!(store.cleanup_expired().unwrap(), 1);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = store_with_ttl(Duration::from_secs(60));
        store.insert(waiting_session("g1")).unwrap();
        assert!(store.remove("g1").unwrap());
        assert!(!store.remove("g1").unwrap());
        assert!(!store.remove("never-existed").unwrap());
    }
}
