//! In-memory admin session tokens.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

struct Session {
    username: String,
    expires_at: Instant,
}

/// Issues and validates short-lived admin session tokens.
///
/// Tokens are opaque uuid-v4 strings held in process memory; a restart
/// invalidates all of them, which is acceptable for a single-admin service.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Mint a new session token for `username`.
    ///
    /// Expired sessions are pruned on each issue, bounding the map to live
    /// sessions plus those expired since the last sign-in.
    pub fn issue(&self, username: &str) -> String {
        let now = Instant::now();
        let token = Uuid::new_v4().to_string();

        let mut sessions = self.sessions.lock();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Whether `token` names a live session. Expired tokens are removed.
    pub fn validate(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        match sessions.get(token) {
            Some(session) if session.expires_at > now => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    /// The username a live token was issued to.
    pub fn username(&self, token: &str) -> Option<String> {
        let now = Instant::now();
        let sessions = self.sessions.lock();
        sessions
            .get(token)
            .filter(|s| s.expires_at > now)
            .map(|s| s.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.issue("admin");

        assert!(store.validate(&token));
        assert_eq!(store.username(&token).as_deref(), Some("admin"));
        assert!(!store.validate("not-a-token"));
        assert!(!store.validate(""));
    }

    #[test]
    fn test_expired_token_is_rejected_and_removed() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.issue("admin");

        assert!(!store.validate(&token));
        // Second check hits the removed-entry path.
        assert!(!store.validate(&token));
    }
}
