use std::sync::Arc;

use dg_domain::config::Config;
use dg_providers::CompletionClient;
use dg_sessions::{InfoClassifier, SessionLockMap, SessionStore};

use crate::persona::PersonaRegistry;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Completion client; a scripted stub in tests.
    pub llm: Arc<dyn CompletionClient>,
    pub personas: Arc<PersonaRegistry>,
    pub sessions: Arc<SessionStore>,
    pub session_locks: Arc<SessionLockMap>,
    /// Pluggable info extractor (keyword scanner by default).
    pub classifier: Arc<dyn InfoClassifier>,
}
