//! Conversation state for the Dharma Gateway.
//!
//! Owns everything the chat endpoint mutates between turns: the
//! in-memory session store (message log + phase state + collected user
//! info), the pure phase classifier, the keyword info extractor, and
//! the per-session turn locks that serialize mutation of a single key.

pub mod extract;
pub mod lock;
pub mod phase;
pub mod store;

pub use extract::{InfoCategory, InfoClassifier, KeywordClassifier};
pub use lock::SessionLockMap;
pub use phase::Phase;
pub use store::{SessionEntry, SessionStore};
