//! Prompt assembly.
//!
//! Builds the ordered message list sent to the completion client:
//! system prompt (persona template + seeking line + state block),
//! the session's message log, then the current user message.

use dg_domain::message::Message;
use dg_sessions::store::SessionEntry;

use crate::persona::Persona;

/// Assemble the completion request messages for one turn.
///
/// The state block reflects the entry as stored *before* this turn's
/// counter increment; `user_info` entries are listed in first-insertion
/// order. When `max_prompt_messages` is set, only the most recent N log
/// entries are included; the stored log itself is never windowed.
///
/// The log already contains the current user message (appended before
/// assembly), and the raw text is appended again as the final user
/// message, so the model sees it in both positions.
pub fn assemble(
    persona: &Persona,
    seeking: &str,
    entry: &SessionEntry,
    user_message: &str,
    max_prompt_messages: Option<usize>,
) -> Vec<Message> {
    let mut system = format!(
        "{}\nThe user is currently seeking: {seeking}.",
        persona.system_prompt
    );

    system.push_str("\n\nCONVERSATION STATE INFORMATION:\n");
    system.push_str(&format!(
        "Questions asked so far: {}\n",
        entry.questions_asked
    ));
    system.push_str(&format!("Current conversation phase: {}\n", entry.phase));

    if !entry.user_info.is_empty() {
        system.push_str("USER INFORMATION COLLECTED SO FAR:\n");
        for (category, value) in &entry.user_info {
            system.push_str(&format!("- {category}: {value}\n"));
        }
    }

    let history: &[Message] = match max_prompt_messages {
        Some(cap) if entry.messages.len() > cap => {
            &entry.messages[entry.messages.len() - cap..]
        }
        _ => &entry.messages,
    };

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system));
    messages.extend(history.iter().cloned());
    messages.push(Message::user(user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_domain::message::Role;
    use dg_sessions::extract::InfoCategory;
    use dg_sessions::phase::Phase;
    use dg_sessions::store::SessionStore;

    use crate::persona::PersonaRegistry;

    fn entry_with(messages: &[Message]) -> SessionEntry {
        let store = SessionStore::new();
        let (mut entry, _) = store.get_or_create("s1", "greeting");
        entry.messages = messages.to_vec();
        entry
    }

    #[test]
    fn system_message_carries_seeking_and_state() {
        let registry = PersonaRegistry::builtin("Saarthi");
        let mut entry = entry_with(&[Message::assistant("greeting")]);
        entry.questions_asked = 2;
        entry.phase = Phase::GatheringInformation;

        let prompt = assemble(
            registry.default_persona(),
            "Inner Peace",
            &entry,
            "hello",
            None,
        );

        assert_eq!(prompt[0].role, Role::System);
        let system = &prompt[0].content;
        assert!(system.contains("The user is currently seeking: Inner Peace."));
        assert!(system.contains("Questions asked so far: 2"));
        assert!(system.contains("Current conversation phase: gathering_information"));
        // No info collected yet, so no info header.
        assert!(!system.contains("USER INFORMATION COLLECTED SO FAR"));
    }

    #[test]
    fn user_info_lines_follow_insertion_order() {
        let registry = PersonaRegistry::builtin("Saarthi");
        let mut entry = entry_with(&[Message::assistant("greeting")]);
        entry.user_info = vec![
            (InfoCategory::CareerConcerns, "my job is hard".into()),
            (InfoCategory::BirthDetails, "born in June".into()),
        ];

        let prompt = assemble(registry.default_persona(), "Clarity", &entry, "hi", None);
        let system = &prompt[0].content;

        let career = system.find("- career_concerns: my job is hard").unwrap();
        let birth = system.find("- birth_details: born in June").unwrap();
        assert!(career < birth);
    }

    #[test]
    fn history_is_appended_in_order_then_current_message() {
        let registry = PersonaRegistry::builtin("Saarthi");
        let entry = entry_with(&[
            Message::assistant("greeting"),
            Message::user("first"),
            Message::assistant("reply"),
        ]);

        let prompt = assemble(registry.default_persona(), "Peace", &entry, "second", None);

        assert_eq!(prompt.len(), 5);
        assert_eq!(prompt[1].content, "greeting");
        assert_eq!(prompt[2].content, "first");
        assert_eq!(prompt[3].content, "reply");
        assert_eq!(prompt[4], Message::user("second"));
    }

    #[test]
    fn window_keeps_only_most_recent_entries() {
        let registry = PersonaRegistry::builtin("Saarthi");
        let entry = entry_with(&[
            Message::assistant("greeting"),
            Message::user("old"),
            Message::assistant("older reply"),
            Message::user("recent"),
        ]);

        let prompt = assemble(registry.default_persona(), "Peace", &entry, "now", Some(2));

        // system + 2 windowed + current.
        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[1].content, "older reply");
        assert_eq!(prompt[2].content, "recent");
    }
}
