use crate::{Session, SessionStore, SessionUpdate};
use async_trait::async_trait;
use chrono::Duration;
use retail_core::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub const DEFAULT_TTL_HOURS: i64 = 24;

/// In-process session storage. Every operation takes the map lock for its
/// whole get-modify-write, which serializes mutations per session id.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::hours(ttl_hours),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_HOURS)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, customer_id: &str) -> Result<Session> {
        let session = Session::new(customer_id);

        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.session_id.clone(), session.clone());
        drop(sessions);

        tracing::info!(
            session_id = %session.session_id,
            customer_id = %session.customer_id,
            "created session"
        );
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(session_id).cloned())
    }

    async fn update(&self, session_id: &str, update: SessionUpdate) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(session) = sessions.get_mut(session_id) {
            update.apply(session);
            session.touch();
        }
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().unwrap();
        let removed = sessions.remove(session_id).is_some();
        drop(sessions);

        if removed {
            tracing::info!(session_id = %session_id, "deleted session");
        }
        Ok(removed)
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl));
        let removed = before - sessions.len();
        drop(sessions);

        if removed > 0 {
            tracing::info!(removed, "cleaned up expired sessions");
        }
        Ok(removed)
    }

    async fn active_count(&self) -> Result<usize> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.len())
    }
}
