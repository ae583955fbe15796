//! Engine configuration.

use std::time::Duration;

/// Tunable limits for the store and orchestrator.
///
/// `Default` carries the operational constants the engine ships with;
/// embedders override individual fields as needed.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Idle retention for stored sessions. Entries untouched for this
    /// long are reclaimed, covering abandoned games.
    pub session_ttl: Duration,
    /// Number of lock acquisition attempts before a store operation
    /// gives up with a transient failure.
    pub lock_retry_budget: u32,
    /// Number of times the orchestrator retries a transient store
    /// failure before surfacing it to the caller.
    pub store_retry_budget: u32,
    /// Pause between transient-failure retries.
    pub retry_backoff: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(3600),
            lock_retry_budget: 4096,
            store_retry_budget: 3,
            retry_backoff: Duration::from_millis(25),
        }
    }
}
