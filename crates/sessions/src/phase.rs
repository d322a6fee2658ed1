//! Conversation phases.
//!
//! A phase is a coarse label describing how far along a conversation
//! is. It is a pure function of the question counter; the one
//! exception is [`Phase::Introduction`], assigned at session creation
//! and overwritten the moment the first real turn is classified.

use serde::{Deserialize, Serialize};

/// The current phase of a guided conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Freshly created session; only the greeting has been sent.
    Introduction,
    /// First question of the conversation.
    InitialQuestions,
    /// Early turns, collecting background from the user.
    GatheringInformation,
    /// Mid conversation, responses shift toward concrete insight.
    DetailedInsights,
    /// Late conversation, wrapping up with closing guidance.
    ConcludingInsights,
}

impl Phase {
    /// Classify the phase from the number of questions asked so far.
    ///
    /// Evaluated on the *pre-increment* count of the current turn, so a
    /// brand-new session classifies as `InitialQuestions`, not
    /// `Introduction`. The thresholds are load-bearing: a count of
    /// exactly 3 is already `DetailedInsights`, and 5 or more is
    /// `ConcludingInsights`.
    pub fn classify(questions_asked: u32) -> Phase {
        match questions_asked {
            0 => Phase::InitialQuestions,
            1..=2 => Phase::GatheringInformation,
            3..=4 => Phase::DetailedInsights,
            _ => Phase::ConcludingInsights,
        }
    }

    /// The snake_case label used on the wire and in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::InitialQuestions => "initial_questions",
            Phase::GatheringInformation => "gathering_information",
            Phase::DetailedInsights => "detailed_insights",
            Phase::ConcludingInsights => "concluding_insights",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
