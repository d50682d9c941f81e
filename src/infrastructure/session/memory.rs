//! In-memory session store

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::{DomainResult, SessionData, SessionId, SessionStore};

/// Sessions untouched for this long are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

struct Entry {
    data: SessionData,
    last_seen: Instant,
}

impl Entry {
    fn new(data: SessionData) -> Self {
        Self {
            data,
            last_seen: Instant::now(),
        }
    }

    fn is_idle(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() >= timeout
    }
}

/// Process-local session store. Sessions do not survive a restart.
///
/// Every read or write refreshes a session. Sessions idle for longer than
/// the timeout read as absent and are swept whenever a new one is stored.
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, Entry>,
    idle_timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    fn drop_if_idle(&self, id: &SessionId) {
        self.sessions
            .remove_if(id, |_, entry| entry.is_idle(self.idle_timeout));
    }

    fn sweep(&self) {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| !entry.is_idle(self.idle_timeout));
        let swept = before.saturating_sub(self.sessions.len());
        if swept > 0 {
            debug!(swept, live = self.sessions.len(), "Idle sessions removed");
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> DomainResult<Option<SessionData>> {
        self.drop_if_idle(id);
        Ok(self.sessions.get_mut(id).map(|mut entry| {
            entry.last_seen = Instant::now();
            entry.data.clone()
        }))
    }

    async fn set(&self, id: &SessionId, data: SessionData) -> DomainResult<()> {
        self.sweep();
        self.sessions.insert(id.clone(), Entry::new(data));
        Ok(())
    }

    async fn update(&self, id: &SessionId, data: SessionData) -> DomainResult<bool> {
        self.drop_if_idle(id);
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                *entry = Entry::new(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self, id: &SessionId) -> DomainResult<()> {
        self.sessions.remove(id);
        Ok(())
    }
}
