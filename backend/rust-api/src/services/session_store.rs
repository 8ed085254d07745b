use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user::Role;

/// Server-side state for one logged-in browser. Exam timers live in
/// `values` under `exam_start_{grade}_{exam_id}` keys as RFC 3339 strings.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub values: HashMap<String, String>,
}

/// In-memory session store keyed by the opaque id carried in the `sid`
/// cookie. Sessions expire `ttl` after creation and are reaped lazily on
/// access.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            ttl: Duration::hours(ttl_hours.max(1)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, user_id: &str, username: &str, role: Role) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = SessionData {
            user_id: user_id.to_string(),
            username: username.to_string(),
            role,
            created_at: Utc::now(),
            values: HashMap::new(),
        };

        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session);

        tracing::info!("Session created for user {}", user_id);
        session_id
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionData> {
        let expired = {
            let sessions = self.sessions.read().await;
            let session = sessions.get(session_id)?;
            session.created_at + self.ttl < Utc::now()
        };

        if expired {
            self.sessions.write().await.remove(session_id);
            tracing::debug!("Session {} expired, removed", session_id);
            return None;
        }

        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn remove(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    pub async fn get_value(&self, session_id: &str, key: &str) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(session_id)?
            .values
            .get(key)
            .cloned()
    }

    /// Returns false when the session no longer exists.
    pub async fn set_value(&self, session_id: &str, key: &str, value: String) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.values.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub async fn remove_value(&self, session_id: &str, key: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(session_id) {
            session.values.remove(key);
        }
    }
}
