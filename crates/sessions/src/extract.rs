//! Keyword-based extraction of user-disclosed facts.
//!
//! The classifier is deliberately simple: a case-insensitive substring
//! scan against fixed keyword tables, first matching category wins.
//! It sits behind the [`InfoClassifier`] trait so it can later be
//! swapped for a real NLP component without touching the session
//! state contract.

use serde::{Deserialize, Serialize};

/// Categories of user information the guide collects across a
/// conversation. Order here is the match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoCategory {
    BirthDetails,
    CareerConcerns,
    RelationshipConcerns,
    HealthConcerns,
}

impl InfoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoCategory::BirthDetails => "birth_details",
            InfoCategory::CareerConcerns => "career_concerns",
            InfoCategory::RelationshipConcerns => "relationship_concerns",
            InfoCategory::HealthConcerns => "health_concerns",
        }
    }
}

impl std::fmt::Display for InfoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw user message into at most one info category.
pub trait InfoClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Option<InfoCategory>;
}

// ── Static keyword tables ───────────────────────────────────────────

const BIRTH_KEYWORDS: &[&str] = &["born", "birth", "birthday"];
const CAREER_KEYWORDS: &[&str] = &["career", "job", "work", "profession"];
const RELATIONSHIP_KEYWORDS: &[&str] = &["relation", "marriage", "partner", "love"];
const HEALTH_KEYWORDS: &[&str] = &["health", "wellness", "sick", "illness"];

/// Priority-ordered category/keyword pairs. The first set that matches
/// claims the message; later sets are not checked even if their
/// keywords also appear.
const CATEGORY_KEYWORDS: &[(InfoCategory, &[&str])] = &[
    (InfoCategory::BirthDetails, BIRTH_KEYWORDS),
    (InfoCategory::CareerConcerns, CAREER_KEYWORDS),
    (InfoCategory::RelationshipConcerns, RELATIONSHIP_KEYWORDS),
    (InfoCategory::HealthConcerns, HEALTH_KEYWORDS),
];

/// The default keyword scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl InfoClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Option<InfoCategory> {
        let lower = text.to_lowercase();
        for (category, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|kw| lower.contains(kw)) {
                return Some(*category);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_each_category() {
        let c = KeywordClassifier;
        assert_eq!(
            c.classify("I was born on a Tuesday"),
            Some(InfoCategory::BirthDetails)
        );
        assert_eq!(
            c.classify("my job is stressful"),
            Some(InfoCategory::CareerConcerns)
        );
        assert_eq!(
            c.classify("thinking about marriage"),
            Some(InfoCategory::RelationshipConcerns)
        );
        assert_eq!(
            c.classify("my health has been poor"),
            Some(InfoCategory::HealthConcerns)
        );
    }

    #[test]
    fn first_match_wins_over_later_categories() {
        let c = KeywordClassifier;
        // Contains both "born" and "career"; birth has higher priority.
        assert_eq!(
            c.classify("I was born in 1990 and my career worries me"),
            Some(InfoCategory::BirthDetails)
        );
        // Contains both "work" and "love"; career comes first.
        assert_eq!(
            c.classify("I love my work"),
            Some(InfoCategory::CareerConcerns)
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = KeywordClassifier;
        assert_eq!(
            c.classify("MY BIRTHDAY IS IN JUNE"),
            Some(InfoCategory::BirthDetails)
        );
    }

    #[test]
    fn substring_matches_count() {
        // "relation" matches inside "relationship".
        let c = KeywordClassifier;
        assert_eq!(
            c.classify("my relationship is complicated"),
            Some(InfoCategory::RelationshipConcerns)
        );
    }

    #[test]
    fn unrelated_text_yields_nothing() {
        let c = KeywordClassifier;
        assert_eq!(c.classify("tell me about the stars"), None);
        assert_eq!(c.classify(""), None);
    }
}
