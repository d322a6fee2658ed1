use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub guide: GuideConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_8000")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".into(),
            cors: CorsConfig::default(),
        }
    }
}

/// Allowed CORS origins. A literal `"*"` allows all origins; entries
/// ending in `:*` match any port on that host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "d_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: d_origins() }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Model identifier sent in the request body.
    #[serde(default = "d_model")]
    pub model: String,
    /// Environment variable holding the API key. Resolved once at
    /// startup; absence is logged as a warning (calls fail later).
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Timeout for a single completion call, in seconds. Expiry is
    /// treated like any other completion failure.
    #[serde(default = "d_30")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            model: d_model(),
            api_key_env: d_api_key_env(),
            timeout_secs: 30,
            sampling: SamplingConfig::default(),
        }
    }
}

/// Sampling parameters for guide replies.
///
/// Defaults are tuned for brief, varied, non-repetitive single-turn
/// answers: moderately high temperature, a tight output cap, and
/// penalties that discourage the model from re-asking questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    #[serde(default = "d_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "d_top_p")]
    pub top_p: f32,
    #[serde(default = "d_frequency_penalty")]
    pub frequency_penalty: f32,
    #[serde(default = "d_presence_penalty")]
    pub presence_penalty: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: d_temperature(),
            max_tokens: d_max_tokens(),
            top_p: d_top_p(),
            frequency_penalty: d_frequency_penalty(),
            presence_penalty: d_presence_penalty(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Session key used when a request carries no explicit `sessionKey`.
    #[serde(default = "d_session_key")]
    pub default_session_key: String,
    /// When set, only the most recent N log entries are included in the
    /// assembled prompt. The stored log itself is never truncated.
    /// `None` sends the full history every turn, which grows without
    /// bound over a long conversation.
    #[serde(default)]
    pub max_prompt_messages: Option<usize>,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            default_session_key: d_session_key(),
            max_prompt_messages: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Guide persona
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Persona used when a request carries no explicit `guide` name,
    /// and the fallback for unknown names.
    #[serde(default = "d_guide")]
    pub default_guide: String,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self { default_guide: d_guide() }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Observability
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// OTLP/gRPC endpoint for span export. `None` disables OpenTelemetry.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "d_service_name")]
    pub service_name: String,
    /// Trace sampling ratio in `[0.0, 1.0]`.
    #[serde(default = "d_sample_rate")]
    pub sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: d_service_name(),
            sample_rate: d_sample_rate(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the resolved configuration.
    ///
    /// Errors are fatal at startup; warnings are logged and ignored.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.llm.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if self.llm.model.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.model".into(),
                message: "model must not be empty".into(),
            });
        }

        if std::env::var(&self.llm.api_key_env).map_or(true, |v| v.is_empty()) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "llm.api_key_env".into(),
                message: format!(
                    "environment variable '{}' is not set; completion calls will fail \
                     until it is provided",
                    self.llm.api_key_env
                ),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.sampling.temperature) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.sampling.temperature".into(),
                message: "temperature must be within 0.0..=2.0".into(),
            });
        }

        if self.llm.sampling.max_tokens == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.sampling.max_tokens".into(),
                message: "max_tokens must be greater than 0".into(),
            });
        }

        if self.sessions.default_session_key.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "sessions.default_session_key".into(),
                message: "default_session_key must not be empty".into(),
            });
        }

        if self
            .server
            .cors
            .allowed_origins
            .iter()
            .any(|o| o == "*")
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "server.cors.allowed_origins".into(),
                message: "wildcard \"*\" allows all origins".into(),
            });
        }

        errors
    }
}

// ── Serde default helpers ──────────────────────────────────────────

fn d_8000() -> u16 {
    8000
}
fn d_host() -> String {
    "0.0.0.0".into()
}
fn d_origins() -> Vec<String> {
    vec!["*".into()]
}
fn d_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_model() -> String {
    "gpt-4o".into()
}
fn d_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn d_30() -> u64 {
    30
}
fn d_temperature() -> f32 {
    0.75
}
fn d_max_tokens() -> u32 {
    350
}
fn d_top_p() -> f32 {
    1.0
}
fn d_frequency_penalty() -> f32 {
    0.3
}
fn d_presence_penalty() -> f32 {
    0.6
}
fn d_session_key() -> String {
    "default_session".into()
}
fn d_guide() -> String {
    "Saarthi".into()
}
fn d_service_name() -> String {
    "dharma-gateway".into()
}
fn d_sample_rate() -> f64 {
    1.0
}
