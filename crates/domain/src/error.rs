/// Shared error type used across all Dharma Gateway crates.
///
/// Every variant represents a per-turn failure; the turn runtime maps
/// all of them to the same apology reply, so the distinctions exist
/// for logs, not for control flow.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("auth: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, Error>;
