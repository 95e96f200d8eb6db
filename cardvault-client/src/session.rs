//! Per-owner sessions: bearer token plus derived content key, with expiry.
//!
//! A session never holds the password. Expired sessions are treated as
//! absent and evicted the next time they are looked up; the vault also
//! purges all of them whenever it opens a new session.

use cardvault_crypto::DerivedKey;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A logged-in owner.
#[derive(Clone)]
pub struct Session {
    pub owner: String,
    pub token: String,
    pub key: DerivedKey,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(owner: String, token: String, key: DerivedKey, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            owner,
            token,
            key,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("owner", &self.owner)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Storage for live sessions keyed by owner.
pub trait SessionStore: Send + Sync {
    /// Returns a live session, evicting it if expired.
    fn get(&self, owner: &str) -> impl Future<Output = Option<Session>> + Send;

    fn insert(&self, session: Session) -> impl Future<Output = ()> + Send;

    fn remove(&self, owner: &str) -> impl Future<Output = Option<Session>> + Send;

    /// Drops every expired session. Returns how many were removed.
    fn purge_expired(&self) -> impl Future<Output = usize> + Send;
}

/// Process-local session store.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get(&self, owner: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(owner) {
                Some(s) if !s.is_expired() => return Some(s.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions.get(owner).is_some_and(Session::is_expired) {
            debug!("session for {owner} expired, evicting");
            sessions.remove(owner);
        }
        None
    }

    async fn insert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.owner.clone(), session);
    }

    async fn remove(&self, owner: &str) -> Option<Session> {
        self.sessions.write().await.remove(owner)
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }
}
