use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::models::conversation::{ConversationKey, ConversationState};

/// In-memory dialogue state, at most one entry per conversation.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ConversationKey, ConversationState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was stored for `key`.
    pub fn set(&mut self, key: ConversationKey, state: ConversationState) {
        self.sessions.insert(key, state);
    }

    pub fn get(&self, key: &ConversationKey) -> Option<&ConversationState> {
        self.sessions.get(key)
    }

    pub fn clear(&mut self, key: &ConversationKey) -> Option<ConversationState> {
        self.sessions.remove(key)
    }

    /// Marks the dialogue as active without changing its step or draft.
    pub fn touch(&mut self, key: &ConversationKey, now: DateTime<Utc>) -> bool {
        match self.sessions.get_mut(key) {
            Some(state) => {
                state.last_activity_at = now;
                true
            }
            None => false,
        }
    }

    /// Like `get`, but an expired dialogue is dropped and reported as absent.
    pub fn get_active(
        &mut self,
        key: &ConversationKey,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<&ConversationState> {
        if self.sessions.get(key)?.is_expired(now, ttl) {
            self.sessions.remove(key);
            return None;
        }
        self.sessions.get(key)
    }

    pub fn expire_stale(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, state| !state.is_expired(now, ttl));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
