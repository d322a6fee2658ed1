//! Cosmetic decoration of outbound replies.
//!
//! Purely presentational: the decorated text goes to the client, while
//! the raw completion output is what gets stored in the message log.
//! Future prompts are therefore built from the undecorated text and
//! ornaments never compound across turns.

/// Fixed ornament table; one entry is picked deterministically per reply.
const ORNAMENTS: &[&str] = &["✨", "🌟", "🌙", "🪐", "🕉️"];

/// Decorate a reply with a celestial ornament.
///
/// Deterministic: the same input always yields the same output, so
/// retries and tests see stable text. Empty replies pass through
/// untouched.
pub fn enrich_reply(reply: &str) -> String {
    if reply.is_empty() {
        return String::new();
    }
    let idx = reply
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_add(b as usize))
        % ORNAMENTS.len();
    let ornament = ORNAMENTS[idx];
    format!("{ornament} {reply} {ornament}")
}
