//! Session management
//!
//! Maps issued session tokens to account ids. Sessions expire after an idle
//! TTL; every successful lookup refreshes `last_accessed`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque token handed to the client
    pub token: String,
    /// Account this session authenticates
    pub account_id: String,
    /// Role the account logged in with
    pub role: i32,
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn new(token: String, account_id: String, role: i32) -> Self {
        Self {
            token,
            account_id,
            role,
            last_accessed: chrono::Utc::now(),
        }
    }

    /// Check if the session has been idle longer than `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let idle = chrono::Utc::now().signed_duration_since(self.last_accessed);
        match idle.to_std() {
            Ok(idle) => idle > ttl,
            // last_accessed in the future
            Err(_) => false,
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed = chrono::Utc::now();
    }
}

/// In-memory session storage, cheap to clone and share between handlers
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Record a session for `token`
    pub async fn create_session(&self, token: String, account_id: String, role: i32) -> Session {
        let session = Session::new(token.clone(), account_id, role);
        self.sessions.write().await.insert(token, session.clone());
        tracing::debug!("Created session for account {}", session.account_id);
        session
    }

    /// Get a live session by token, dropping it if it has expired
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(token) {
            if session.is_expired(self.ttl) {
                sessions.remove(token);
                return None;
            }
            session.touch();
            return Some(session.clone());
        }
        None
    }

    pub async fn delete_session(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Remove every expired session, returning how many were dropped
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, session| !session.is_expired(ttl));
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Periodically purge expired sessions until the runtime shuts down
    pub fn spawn_cleanup(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let removed = manager.cleanup_expired().await;
                if removed > 0 {
                    tracing::debug!("Purged {} expired sessions", removed);
                }
            }
        })
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }
}
