//! In-memory session store with idle expiry
//!
//! Sessions are kept in a map keyed by session id. Every successful load or
//! save marks the session as used; a session untouched for longer than the
//! configured timeout is treated as absent. Expired sessions are evicted on
//! next access, on every save, or by [`InMemorySessionStore::purge_expired`],
//! so sessions whose client never returns do not accumulate.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use sk_core::domain::entities::SessionData;
use sk_core::errors::DomainError;
use sk_core::repositories::SessionStore;
use sk_shared::SessionConfig;

/// Default idle timeout (1 hour)
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct Entry {
    data: SessionData,
    last_used: Instant,
}

/// Session store backed by a process-local map
#[derive(Debug)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    /// Create a store expiring sessions idle for longer than `idle_timeout`
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Create a store using the configured session timeout
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(Duration::from_secs(config.timeout))
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Number of stored sessions, expired ones included until purged
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every session idle past the timeout, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        self.purge_locked(&mut entries, Instant::now())
    }

    fn purge_locked(&self, entries: &mut HashMap<String, Entry>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "purged expired sessions");
        }
        purged
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_used) > self.idle_timeout
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let expired = match entries.get(session_id) {
            None => return Ok(None),
            Some(entry) => self.is_expired(entry, now),
        };
        if expired {
            entries.remove(session_id);
            debug!(session_id, "session expired");
            return Ok(None);
        }

        Ok(entries.get_mut(session_id).map(|entry| {
            entry.last_used = now;
            entry.data.clone()
        }))
    }

    async fn save(&self, session_id: &str, data: SessionData) -> Result<(), DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        self.purge_locked(&mut entries, now);
        entries.insert(
            session_id.to_string(),
            Entry {
                data,
                last_used: now,
            },
        );
        Ok(())
    }

    async fn destroy(&self, session_id: &str) -> Result<bool, DomainError> {
        Ok(self.entries.write().await.remove(session_id).is_some())
    }
}
