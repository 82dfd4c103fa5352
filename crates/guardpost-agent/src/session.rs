//! Per-session conversation memory.
//!
//! Sessions live in a concurrent map and expire after a TTL of inactivity;
//! expired entries are pruned on access rather than by a background task.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use guardpost_core::Message;
use tracing::debug;

struct Session {
    messages: Vec<Message>,
    touched: Instant,
}

/// In-memory conversation store keyed by session id.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: DashMap::new(), ttl }
    }

    /// History for a session. Empty for unknown or expired sessions.
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.prune();
        self.sessions
            .get(session_id)
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Records one completed turn and refreshes the session's TTL.
    pub fn append_turn(&self, session_id: &str, user_input: &str, assistant_reply: &str) {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session { messages: Vec::new(), touched: Instant::now() });
        entry.messages.push(Message::user(user_input));
        entry.messages.push(Message::assistant(assistant_reply));
        entry.touched = Instant::now();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn prune(&self) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.touched.elapsed() < ttl);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, "pruned expired sessions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_accumulate_per_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.append_turn("s1", "hello", "hi there");
        store.append_turn("s1", "who is on duty?", "two guards");
        store.append_turn("s2", "unrelated", "ok");

        let history = store.history("s1");
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[3].content, "two guards");
        assert_eq!(store.history("s2").len(), 2);
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.history("nope").is_empty());
    }

    #[test]
    fn test_expired_sessions_are_pruned() {
        let store = SessionStore::new(Duration::ZERO);
        store.append_turn("s1", "hello", "hi");
        assert!(store.history("s1").is_empty());
        assert!(store.is_empty());
    }
}
