//! Bounded in-memory store for HTTP conversation sessions.
//!
//! Sessions idle longer than the configured window read as absent and are
//! swept whenever a new session is created. Past `max_sessions` the least
//! recently used session is dropped.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use licnav_core::chat::history::ConversationHistory;
use licnav_types::chat::ConversationTurn;
use licnav_types::config::ServerConfig;

struct Session {
    history: ConversationHistory,
    last_access: Instant,
}

pub struct SessionStore {
    sessions: DashMap<String, Session>,
    max_sessions: usize,
    idle: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            idle,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.max_sessions, Duration::from_secs(config.session_idle_secs))
    }

    /// Clone of the session's history. Marks the session as used.
    ///
    /// The clone is taken so no map guard is held across an await.
    pub fn snapshot(&self, id: &str) -> Option<ConversationHistory> {
        {
            let mut entry = self.sessions.get_mut(id)?;
            if entry.last_access.elapsed() < self.idle {
                entry.last_access = Instant::now();
                return Some(entry.history.clone());
            }
        }
        self.sessions
            .remove_if(id, |_, session| session.last_access.elapsed() >= self.idle);
        None
    }

    /// Append a turn, creating the session if needed.
    pub fn record(&self, id: &str, turn: ConversationTurn) {
        if !self.sessions.contains_key(id) {
            self.make_room();
        }
        let mut entry = self.sessions.entry(id.to_string()).or_insert_with(|| Session {
            history: ConversationHistory::new(),
            last_access: Instant::now(),
        });
        entry.history.record(turn);
        entry.last_access = Instant::now();
    }

    pub fn remove(&self, id: &str) -> Option<ConversationHistory> {
        self.sessions.remove(id).map(|(_, session)| session.history)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn make_room(&self) {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_access.elapsed() < self.idle);
        let expired = before.saturating_sub(self.sessions.len());
        if expired > 0 {
            debug!(expired, "dropped idle sessions");
        }

        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_access)
                .map(|entry| entry.key().clone());
            let Some(id) = oldest else {
                break;
            };
            self.sessions.remove(&id);
            debug!(session_id = %id, "session limit reached, dropped least recently used");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(text: &str) -> ConversationTurn {
        ConversationTurn::new(text, format!("answer to {text}"))
    }

    #[test]
    fn record_then_snapshot() {
        let store = SessionStore::new(10, Duration::from_secs(60));
        assert!(store.snapshot("a").is_none());

        store.record("a", turn("bakery"));
        store.record("a", turn("food truck"));
        let history = store.snapshot("a").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove("a").map(|h| h.len()), Some(2));
        assert!(store.is_empty());
    }

    #[test]
    fn idle_sessions_expire() {
        let store = SessionStore::new(10, Duration::ZERO);
        store.record("a", turn("bakery"));
        assert!(store.snapshot("a").is_none());
        assert!(store.is_empty());

        store.record("b", turn("salon"));
        store.record("c", turn("dispensary"));
        // Creating "c" swept "b".
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn least_recently_used_session_is_dropped_at_capacity() {
        let store = SessionStore::new(2, Duration::from_secs(60));
        store.record("a", turn("bakery"));
        std::thread::sleep(Duration::from_millis(5));
        store.record("b", turn("salon"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.snapshot("a").is_some());
        std::thread::sleep(Duration::from_millis(5));

        store.record("c", turn("dispensary"));
        assert_eq!(store.len(), 2);
        assert!(store.snapshot("a").is_some());
        assert!(store.snapshot("b").is_none());
        assert!(store.snapshot("c").is_some());
    }

    #[test]
    fn existing_session_does_not_evict() {
        let store = SessionStore::new(1, Duration::from_secs(60));
        store.record("a", turn("bakery"));
        store.record("a", turn("food truck"));
        assert_eq!(store.snapshot("a").map(|h| h.len()), Some(2));
    }
}
