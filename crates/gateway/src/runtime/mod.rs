//! Turn runtime: the per-request pipeline behind `POST /chat`.
//!
//! [`run_turn`] owns the full sequence for one message: resolve the
//! session (seeding the greeting on first contact), extract
//! user-disclosed info, classify the conversation phase, assemble the
//! prompt, call the completion client, decorate the reply, persist the
//! raw reply, and bump the question counter. The per-session lock is
//! held across the whole sequence, including the completion call, so
//! turns on one session key are serialized end to end.

pub mod enrich;
pub mod prompt;

use dg_providers::ChatRequest;
use dg_sessions::Phase;

use crate::state::AppState;

/// Fixed reply substituted when the completion call fails for any
/// reason. The turn still completes: the apology is stored, the counter
/// still increments, and the caller sees HTTP success.
pub const APOLOGY: &str = "I apologize, but I am unable to connect with the \
cosmic energies at this moment. Please try again later.";

/// Input for one chat turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub session_key: String,
    pub message: String,
    /// The user's declared goal, folded into the system prompt.
    pub seeking: String,
    /// Guide persona name; unknown names fall back to the default.
    pub guide: String,
}

/// Outcome of one chat turn.
#[derive(Debug, Clone)]
pub enum TurnOutput {
    /// First-ever contact with an empty message: the greeting is
    /// returned without touching the counter or calling the model.
    Greeting { response: String },
    /// A full processed turn.
    Reply {
        response: String,
        questions_asked: u32,
        phase: Phase,
    },
}

/// Run one chat turn to completion.
///
/// Never returns an error: every per-turn failure degrades to the
/// apology reply.
pub async fn run_turn(state: &AppState, input: TurnInput) -> TurnOutput {
    let persona = state.personas.get(&input.guide);
    let key = input.session_key.as_str();

    // Exclusive access for the whole turn. Turns on other keys proceed
    // in parallel; a second message on this key waits here.
    let _permit = state.session_locks.acquire(key).await;

    let (_, is_new) = state.sessions.get_or_create(key, persona.greeting);

    // First contact with a blank message terminates immediately with
    // the greeting; the session stays at questions_asked == 0. A blank
    // message on an existing session runs a normal turn.
    if is_new && input.message.trim().is_empty() {
        return TurnOutput::Greeting {
            response: persona.greeting.to_owned(),
        };
    }

    state.sessions.append_user(key, &input.message);

    // Extraction never aborts the turn: the classifier is infallible
    // and a non-match simply records nothing.
    if let Some(category) = state.classifier.classify(&input.message) {
        state.sessions.record_info(key, category, &input.message);
        tracing::debug!(session_key = %key, category = %category, "user info recorded");
    }

    // Phase is classified from the pre-increment count and stored
    // before the completion call so the prompt sees the fresh label.
    let snapshot = match state.sessions.get(key) {
        Some(entry) => entry,
        // Unreachable: the entry was just created and nothing evicts.
        None => {
            tracing::error!(session_key = %key, "session vanished mid-turn");
            return TurnOutput::Greeting {
                response: persona.greeting.to_owned(),
            };
        }
    };
    let phase = Phase::classify(snapshot.questions_asked);
    state.sessions.set_phase(key, phase);

    let mut snapshot = snapshot;
    snapshot.phase = phase;

    let sampling = &state.config.llm.sampling;
    let request = ChatRequest {
        messages: prompt::assemble(
            persona,
            &input.seeking,
            &snapshot,
            &input.message,
            state.config.sessions.max_prompt_messages,
        ),
        model: None,
        temperature: Some(sampling.temperature),
        max_tokens: Some(sampling.max_tokens),
        top_p: Some(sampling.top_p),
        frequency_penalty: Some(sampling.frequency_penalty),
        presence_penalty: Some(sampling.presence_penalty),
    };

    // The apology is returned verbatim, without decoration, so callers
    // can match on the fixed string.
    let (raw_reply, response) = match state.llm.chat(&request).await {
        Ok(resp) => {
            tracing::debug!(
                session_key = %key,
                model = %resp.model,
                finish_reason = ?resp.finish_reason,
                "completion received"
            );
            let enriched = enrich::enrich_reply(&resp.content);
            (resp.content, enriched)
        }
        Err(e) => {
            tracing::error!(session_key = %key, error = %e, "completion call failed");
            (APOLOGY.to_owned(), APOLOGY.to_owned())
        }
    };

    // Store the raw reply; the decorated form is for the caller only.
    state.sessions.append_assistant(key, &raw_reply);
    let questions_asked = state.sessions.increment_questions(key);

    TurnOutput::Reply {
        response,
        questions_asked,
        phase,
    }
}
