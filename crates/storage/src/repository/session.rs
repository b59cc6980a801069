use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Session, SessionState};

pub const DEFAULT_MAX_SESSIONS: usize = 100;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// In-process session store. Nothing survives a restart.
///
/// Idle sessions expire after `idle_ttl`, and the store never holds more than
/// `max_sessions`. Both limits are enforced on insert; running sessions are
/// never evicted.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_SECS)
    }
}

impl SessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: usize, idle_ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            idle_ttl: Duration::seconds(i64::from(
                u32::try_from(idle_ttl_secs).unwrap_or(u32::MAX),
            )),
        }
    }

    pub async fn insert(&self, session: Session) -> Uuid {
        let session_id = session.session_id;
        let mut sessions = self.sessions.write().await;

        let evicted = self.evict(&mut sessions, Utc::now());
        if evicted > 0 {
            tracing::info!("Evicted {} idle sessions", evicted);
        }

        sessions.insert(session_id, session);
        tracing::debug!("Stored session {} ({} held)", session_id, sessions.len());
        session_id
    }

    pub async fn find_by_id(&self, session_id: Uuid) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    /// Applies `f` to the stored session under the write lock.
    ///
    /// The lock is released before this returns, so callers must not hold
    /// onto it across slow work.
    pub async fn update<F, T>(&self, session_id: Uuid, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(StorageError::NotFound)?;
        let value = f(session)?;
        session.updated_at = Utc::now();
        Ok(value)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops expired sessions, then the least recently updated ones until
    /// there is room for one more.
    fn evict(&self, sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        let cutoff = now - self.idle_ttl;
        sessions.retain(|_, session| {
            session.state == SessionState::Running || session.updated_at >= cutoff
        });

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .filter(|session| session.state != SessionState::Running)
                .min_by_key(|session| session.updated_at)
                .map(|session| session.session_id);
            match oldest {
                Some(session_id) => {
                    sessions.remove(&session_id);
                }
                None => break,
            }
        }

        before - sessions.len()
    }
}
