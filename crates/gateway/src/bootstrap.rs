//! AppState construction extracted from `main.rs`.

use std::sync::Arc;

use anyhow::Context;

use dg_domain::config::{Config, ConfigSeverity};
use dg_providers::OpenAiCompatProvider;
use dg_sessions::{KeywordClassifier, SessionLockMap, SessionStore};

use crate::persona::PersonaRegistry;
use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Completion client ────────────────────────────────────────────
    // A missing API key warns here and fails per-turn, never at boot.
    let llm = Arc::new(
        OpenAiCompatProvider::from_config(&config.llm)
            .context("initializing completion client")?,
    );
    tracing::info!(
        base_url = %config.llm.base_url,
        model = %config.llm.model,
        "completion client ready"
    );

    // ── Personas ─────────────────────────────────────────────────────
    let personas = Arc::new(PersonaRegistry::builtin(&config.guide.default_guide));
    tracing::info!(
        default_guide = %personas.default_persona().name,
        guides = ?personas.names(),
        "persona registry ready"
    );

    // ── Session state ────────────────────────────────────────────────
    let sessions = Arc::new(SessionStore::new());
    let session_locks = Arc::new(SessionLockMap::new());

    Ok(AppState {
        config,
        llm,
        personas,
        sessions,
        session_locks,
        classifier: Arc::new(KeywordClassifier),
    })
}
