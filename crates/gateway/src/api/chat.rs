//! `POST /chat`: the conversational endpoint.
//!
//! Every per-turn failure degrades to a persona-toned apology inside a
//! 200 response; the only non-success this handler produces is axum's
//! own 422 for a body that fails schema validation.

use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use crate::runtime::{run_turn, TurnInput, TurnOutput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// User message text. Required; empty is allowed (first contact).
    pub message: String,
    /// The user's declared goal, folded into the system prompt.
    #[serde(default = "d_seeking")]
    pub seeking: String,
    /// Guide persona name. Unknown names fall back to the default.
    #[serde(default)]
    pub guide: Option<String>,
    /// Explicit session key. Absent, the configured default key is
    /// used, which makes all anonymous callers share one conversation.
    #[serde(default)]
    pub session_key: Option<String>,
}

fn d_seeking() -> String {
    "Inner Peace".into()
}

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Json<serde_json::Value> {
    let input = TurnInput {
        session_key: body
            .session_key
            .unwrap_or_else(|| state.config.sessions.default_session_key.clone()),
        message: body.message,
        seeking: body.seeking,
        guide: body
            .guide
            .unwrap_or_else(|| state.config.guide.default_guide.clone()),
    };

    match run_turn(&state, input).await {
        TurnOutput::Greeting { response } => Json(serde_json::json!({
            "response": response,
            "isFirstMessage": true,
        })),
        TurnOutput::Reply {
            response,
            questions_asked,
            phase,
        } => Json(serde_json::json!({
            "response": response,
            "questionsAsked": questions_asked,
            "phase": phase.as_str(),
        })),
    }
}
