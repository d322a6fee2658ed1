//! In-memory session store.
//!
//! Each session key maps to a [`SessionEntry`] holding the full message
//! log and the conversation phase state. State lives for the lifetime
//! of the process: no eviction, no TTL, no persistence across restarts.
//! The message log grows monotonically and is never reordered or
//! truncated; callers that need a bounded prompt window it at
//! assembly time.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use dg_domain::message::Message;

use crate::extract::InfoCategory;
use crate::phase::Phase;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session entry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One logical conversation: message log plus phase state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntry {
    pub session_key: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered message log, seeded with the persona greeting.
    pub messages: Vec<Message>,
    /// Incremented once per completed turn, whether or not the reply
    /// actually contained a question.
    pub questions_asked: u32,
    pub phase: Phase,
    /// Collected user info, last-seen verbatim message per category.
    /// Kept as an insertion-ordered list so the prompt state block
    /// lists entries in the order they first appeared.
    pub user_info: Vec<(InfoCategory, String)>,
}

impl SessionEntry {
    fn new(session_key: &str, greeting: &str) -> Self {
        let now = Utc::now();
        Self {
            session_key: session_key.to_owned(),
            session_id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            messages: vec![Message::assistant(greeting)],
            questions_asked: 0,
            phase: Phase::Introduction,
            user_info: Vec::new(),
        }
    }

    /// The last-seen message for a category, if any.
    pub fn info(&self, category: InfoCategory) -> Option<&str> {
        self.user_info
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process-wide session store.
///
/// Reads hand out clones (snapshots); mutation goes through the
/// targeted helpers below. Per-turn atomicity of the read-modify-write
/// sequence is the caller's job via [`crate::lock::SessionLockMap`];
/// the store itself only guarantees that each individual operation is
/// consistent.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session snapshot by its key.
    pub fn get(&self, session_key: &str) -> Option<SessionEntry> {
        self.sessions.read().get(session_key).cloned()
    }

    /// Resolve or create a session for the given key. Returns
    /// `(snapshot, is_new)`. A new session is seeded with the persona
    /// greeting as its first assistant message and
    /// `phase = introduction`.
    pub fn get_or_create(&self, session_key: &str, greeting: &str) -> (SessionEntry, bool) {
        // Fast path: session already exists.
        {
            let sessions = self.sessions.read();
            if let Some(entry) = sessions.get(session_key) {
                return (entry.clone(), false);
            }
        }

        let mut sessions = self.sessions.write();
        // A racing creator may have won between the locks; keep theirs.
        if let Some(entry) = sessions.get(session_key) {
            return (entry.clone(), false);
        }

        let entry = SessionEntry::new(session_key, greeting);
        sessions.insert(session_key.to_owned(), entry.clone());

        tracing::info!(
            session_key = %session_key,
            session_id = %entry.session_id,
            "new session created"
        );

        (entry, true)
    }

    /// Append the current turn's raw user message to the log.
    pub fn append_user(&self, session_key: &str, text: &str) {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_key) {
            entry.messages.push(Message::user(text));
            entry.updated_at = Utc::now();
        }
    }

    /// Append an assistant reply to the log.
    ///
    /// Callers must pass the *raw* completion output, never the
    /// enriched form returned to the client; future prompts are built
    /// from this log.
    pub fn append_assistant(&self, session_key: &str, text: &str) {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_key) {
            entry.messages.push(Message::assistant(text));
            entry.updated_at = Utc::now();
        }
    }

    /// Record the verbatim message under a category, overwriting any
    /// previous value while keeping the category's original position.
    pub fn record_info(&self, session_key: &str, category: InfoCategory, message: &str) {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_key) {
            match entry.user_info.iter_mut().find(|(c, _)| *c == category) {
                Some((_, value)) => *value = message.to_owned(),
                None => entry.user_info.push((category, message.to_owned())),
            }
            entry.updated_at = Utc::now();
        }
    }

    /// Overwrite the stored phase (classified from the pre-turn count).
    pub fn set_phase(&self, session_key: &str, phase: Phase) {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_key) {
            entry.phase = phase;
        }
    }

    /// Bump the question counter. Returns the post-increment count.
    pub fn increment_questions(&self, session_key: &str) -> u32 {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(session_key) {
            Some(entry) => {
                entry.questions_asked += 1;
                entry.updated_at = Utc::now();
                entry.questions_asked
            }
            None => 0,
        }
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = "Namaste 🙏 I am your guide.";

    #[test]
    fn new_session_is_seeded_with_greeting() {
        let store = SessionStore::new();
        let (entry, is_new) = store.get_or_create("s1", GREETING);

        assert!(is_new);
        assert_eq!(entry.phase, Phase::Introduction);
        assert_eq!(entry.questions_asked, 0);
        assert!(entry.user_info.is_empty());
        assert_eq!(entry.messages.len(), 1);
        assert_eq!(entry.messages[0], Message::assistant(GREETING));
    }

    #[test]
    fn second_access_returns_same_session() {
        let store = SessionStore::new();
        let (first, _) = store.get_or_create("s1", GREETING);
        let (second, is_new) = store.get_or_create("s1", GREETING);

        assert!(!is_new);
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn record_info_overwrites_in_place() {
        let store = SessionStore::new();
        store.get_or_create("s1", GREETING);

        store.record_info("s1", InfoCategory::BirthDetails, "born in June");
        store.record_info("s1", InfoCategory::CareerConcerns, "my job is hard");
        store.record_info("s1", InfoCategory::BirthDetails, "born in 1990, actually");

        let entry = store.get("s1").unwrap();
        assert_eq!(entry.user_info.len(), 2);
        // Overwrite kept the original insertion position.
        assert_eq!(entry.user_info[0].0, InfoCategory::BirthDetails);
        assert_eq!(entry.user_info[0].1, "born in 1990, actually");
        assert_eq!(entry.user_info[1].0, InfoCategory::CareerConcerns);
    }

    #[test]
    fn message_log_preserves_order() {
        let store = SessionStore::new();
        store.get_or_create("s1", GREETING);
        store.append_user("s1", "hello");
        store.append_assistant("s1", "namaste");
        store.append_user("s1", "I was born in June");

        let entry = store.get("s1").unwrap();
        let contents: Vec<&str> = entry.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![GREETING, "hello", "namaste", "I was born in June"]
        );
    }

    #[test]
    fn increment_returns_post_increment_count() {
        let store = SessionStore::new();
        store.get_or_create("s1", GREETING);
        assert_eq!(store.increment_questions("s1"), 1);
        assert_eq!(store.increment_questions("s1"), 2);
        assert_eq!(store.get("s1").unwrap().questions_asked, 2);
    }

    #[test]
    fn mutations_on_unknown_keys_are_noops() {
        let store = SessionStore::new();
        store.append_user("ghost", "hello");
        store.set_phase("ghost", Phase::DetailedInsights);
        assert_eq!(store.increment_questions("ghost"), 0);
        assert!(store.get("ghost").is_none());
    }
}
