use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::domain::ChatMessage;

/// Bounds applied to the in-memory conversation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPolicy {
    pub max_conversations: usize,
    pub idle_ttl: Duration,
    pub max_messages: usize,
}

impl Default for ConversationPolicy {
    fn default() -> Self {
        Self {
            max_conversations: 1000,
            idle_ttl: Duration::minutes(60),
            max_messages: 50,
        }
    }
}

#[derive(Debug)]
struct Conversation {
    messages: Vec<ChatMessage>,
    last_active: DateTime<Utc>,
}

/// Keyed conversation history with a capacity limit and idle expiry.
///
/// Expired conversations are dropped lazily on access. When a new conversation would exceed
/// the capacity, the least recently active one is evicted.
#[derive(Debug)]
pub struct ConversationStore {
    policy: ConversationPolicy,
    conversations: Mutex<HashMap<String, Conversation>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(ConversationPolicy::default())
    }
}

impl ConversationStore {
    pub fn new(policy: ConversationPolicy) -> Self {
        Self {
            policy,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &ConversationPolicy {
        &self.policy
    }

    pub fn append(&self, key: &str, message: ChatMessage, now: DateTime<Utc>) {
        let mut conversations = self.lock();
        self.purge_locked(&mut conversations, now);

        if !conversations.contains_key(key) {
            self.make_room_locked(&mut conversations);
        }

        let conversation = conversations
            .entry(key.to_string())
            .or_insert_with(|| Conversation {
                messages: Vec::new(),
                last_active: now,
            });
        conversation.messages.push(message);
        conversation.last_active = now;

        let overflow = conversation
            .messages
            .len()
            .saturating_sub(self.policy.max_messages);
        if overflow > 0 {
            conversation.messages.drain(..overflow);
        }
    }

    /// The last `limit` messages of a live conversation, oldest first.
    pub fn recent(&self, key: &str, limit: usize, now: DateTime<Utc>) -> Vec<ChatMessage> {
        let mut conversations = self.lock();
        self.purge_locked(&mut conversations, now);

        conversations
            .get(key)
            .map(|conversation| {
                let start = conversation.messages.len().saturating_sub(limit);
                conversation.messages[start..].to_vec()
            })
            .unwrap_or_default()
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut conversations = self.lock();
        self.purge_locked(&mut conversations, now)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Conversation>> {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn purge_locked(
        &self,
        conversations: &mut HashMap<String, Conversation>,
        now: DateTime<Utc>,
    ) -> usize {
        let before = conversations.len();
        let ttl = self.policy.idle_ttl;
        conversations.retain(|_, conversation| now - conversation.last_active < ttl);
        let purged = before - conversations.len();
        if purged > 0 {
            debug!(purged, "expired idle conversations");
        }
        purged
    }

    fn make_room_locked(&self, conversations: &mut HashMap<String, Conversation>) {
        while !conversations.is_empty() && conversations.len() >= self.policy.max_conversations {
            let oldest = conversations
                .iter()
                .min_by_key(|(_, conversation)| conversation.last_active)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    conversations.remove(&key);
                    debug!(conversation = %key, "evicted least recently active conversation");
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 16, 9, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(minute)
    }

    fn store(max_conversations: usize, ttl_minutes: i64, max_messages: usize) -> ConversationStore {
        ConversationStore::new(ConversationPolicy {
            max_conversations,
            idle_ttl: Duration::minutes(ttl_minutes),
            max_messages,
        })
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let store = store(10, 60, 50);
        for index in 0..7 {
            store.append("alice", ChatMessage::user(format!("m{index}")), at(index));
        }

        let recent = store.recent("alice", 5, at(8));

        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4", "m5", "m6"]);
        assert!(store.recent("bob", 5, at(8)).is_empty());
    }

    #[test]
    fn idle_conversations_expire() {
        let store = store(10, 30, 50);
        store.append("alice", ChatMessage::user("hello"), at(0));
        store.append("bob", ChatMessage::user("hi"), at(20));

        assert!(store.recent("alice", 5, at(31)).is_empty());
        assert_eq!(store.recent("bob", 5, at(31)).len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn capacity_evicts_least_recently_active() {
        let store = store(2, 600, 50);
        store.append("alice", ChatMessage::user("a"), at(0));
        store.append("bob", ChatMessage::user("b"), at(1));
        store.append("alice", ChatMessage::assistant("reply"), at(2));
        store.append("carol", ChatMessage::user("c"), at(3));

        assert_eq!(store.len(), 2);
        assert!(store.recent("bob", 5, at(4)).is_empty());
        assert_eq!(store.recent("alice", 5, at(4)).len(), 2);
        assert_eq!(store.recent("carol", 5, at(4)).len(), 1);
    }

    #[test]
    fn history_is_trimmed_to_message_cap() {
        let store = store(10, 600, 3);
        for index in 0..5 {
            store.append("alice", ChatMessage::user(format!("m{index}")), at(index));
        }

        let recent = store.recent("alice", 10, at(6));
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "m2");
    }

    #[test]
    fn purge_reports_removed_conversations() {
        let store = store(10, 5, 50);
        store.append("alice", ChatMessage::user("a"), at(0));
        store.append("bob", ChatMessage::user("b"), at(1));

        assert_eq!(store.purge_expired(at(10)), 2);
        assert!(store.is_empty());
    }
}
