//! Rule-based question intent classifier
//!
//! Rules are data: an ordered table of (condition, label) pairs evaluated
//! against the trimmed, lower-cased question. The first matching rule wins,
//! and the table always ends with a catch-all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Question intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Academic content question
    SubjectQuestion,
    /// Study help, motivation, being stuck
    GuidanceQuestion,
    /// Greetings, acknowledgements, fragments
    GeneralChat,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::SubjectQuestion => "SUBJECT_QUESTION",
            Classification::GuidanceQuestion => "GUIDANCE_QUESTION",
            Classification::GeneralChat => "GENERAL_CHAT",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Words that make a very short question academic
pub const QUESTION_WORDS: &[&str] = &["what", "why", "how", "define", "explain"];

pub const GUIDANCE_PHRASES: &[&str] = &[
    "i am stuck",
    "i'm stuck",
    "what should i do",
    "how to study",
    "i don't understand",
    "dont understand",
    "how to prepare",
    "i feel confused",
    "guide me",
    "i need help",
    "help me",
    "confused",
    "struggle",
    "how do i",
    "how should i",
    "lost",
    "advice",
    "tips",
    "studying",
    "motivation",
    "prepare",
];

pub const SUBJECT_PHRASES: &[&str] = &[
    "what is",
    "whats",
    "define",
    "explain",
    "algorithm",
    "theory",
    "concept",
    "formula",
    "model",
    "architecture",
    "system",
    "process",
    "method",
    "technique",
    "approach",
    "difference between",
    "difference",
    "why",
    "when",
    "how does",
    "describe",
    "analyze",
    "discuss",
    "case",
    "example",
    "implementation",
    "network",
    "machine",
    "learning",
    "neural",
    "classification",
    "regression",
    "clustering",
    "data",
    "feature",
    "training",
    "testing",
    "validation",
];

pub const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "bye", "goodbye", "thanks", "ok", "yes", "no",
];

/// What a rule checks
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// At most `n` tokens
    AtMostTokens(usize),
    /// At most `n` tokens and none of the words present
    ShortWithout(usize, &'static [&'static str]),
    /// Any of the phrases present as a substring
    ContainsAny(&'static [&'static str]),
    /// Equal to, or starting with, any of the words
    StartsWithAny(&'static [&'static str]),
    /// Fewer than `n` tokens
    FewerTokensThan(usize),
    /// Always matches
    Always,
}

impl Condition {
    fn matches(&self, query: &NormalizedQuery) -> bool {
        match *self {
            Condition::AtMostTokens(n) => query.tokens <= n,
            Condition::ShortWithout(n, words) => query.tokens <= n && !query.contains_any(words),
            Condition::ContainsAny(phrases) => query.contains_any(phrases),
            Condition::StartsWithAny(words) => words
                .iter()
                .any(|w| query.text == *w || query.text.starts_with(w)),
            Condition::FewerTokensThan(n) => query.tokens < n,
            Condition::Always => true,
        }
    }
}

/// One classification rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub condition: Condition,
    pub label: Classification,
}

const DEFAULT_RULE: Rule = Rule {
    name: "default",
    condition: Condition::Always,
    label: Classification::SubjectQuestion,
};

/// Classification rules in priority order
pub const RULES: &[Rule] = &[
    Rule {
        name: "single_token",
        condition: Condition::AtMostTokens(1),
        label: Classification::GeneralChat,
    },
    Rule {
        name: "short_without_question_word",
        condition: Condition::ShortWithout(3, QUESTION_WORDS),
        label: Classification::GeneralChat,
    },
    Rule {
        name: "guidance_phrase",
        condition: Condition::ContainsAny(GUIDANCE_PHRASES),
        label: Classification::GuidanceQuestion,
    },
    Rule {
        name: "subject_phrase",
        condition: Condition::ContainsAny(SUBJECT_PHRASES),
        label: Classification::SubjectQuestion,
    },
    Rule {
        name: "greeting",
        condition: Condition::StartsWithAny(GREETINGS),
        label: Classification::GeneralChat,
    },
    Rule {
        name: "fewer_than_four_tokens",
        condition: Condition::FewerTokensThan(4),
        label: Classification::GeneralChat,
    },
    DEFAULT_RULE,
];

struct NormalizedQuery {
    text: String,
    tokens: usize,
}

impl NormalizedQuery {
    fn new(question: &str) -> Self {
        let text = question.trim().to_lowercase();
        let tokens = token_count(&text);
        Self { text, tokens }
    }

    fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.text.contains(p))
    }
}

/// Whitespace-delimited token count
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Classify a question
pub fn classify(question: &str) -> Classification {
    matching_rule(question).label
}

/// The first rule matching a question
pub fn matching_rule(question: &str) -> &'static Rule {
    let query = NormalizedQuery::new(question);
    RULES
        .iter()
        .find(|rule| rule.condition.matches(&query))
        .unwrap_or(&DEFAULT_RULE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_questions() {
        assert_eq!(classify("hi"), Classification::GeneralChat);
        assert_eq!(classify("What is backpropagation?"), Classification::SubjectQuestion);
        assert_eq!(classify("I am stuck on recursion"), Classification::GuidanceQuestion);
        assert_eq!(classify("ok"), Classification::GeneralChat);
    }

    #[test]
    fn test_each_rule_is_reachable() {
        let cases = [
            ("recursion", "single_token"),
            ("thanks a lot", "short_without_question_word"),
            ("how should i revise for exams", "guidance_phrase"),
            ("what is gradient descent", "subject_phrase"),
            ("hello how are you", "greeting"),
            ("how come", "fewer_than_four_tokens"),
            ("tell me about the french revolution", "default"),
        ];

        for (question, rule) in cases {
            assert_eq!(matching_rule(question).name, rule, "question: {}", question);
        }
    }

    #[test]
    fn test_rule_order_guidance_beats_subject() {
        // Contains both "explain" and "confused"; guidance comes first
        assert_eq!(
            classify("I am confused, please explain neural networks"),
            Classification::GuidanceQuestion
        );
    }

    #[test]
    fn test_short_question_with_question_word_falls_through() {
        assert_eq!(classify("define entropy"), Classification::SubjectQuestion);
        assert_eq!(matching_rule("define entropy").name, "subject_phrase");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(classify("   HELLO   "), Classification::GeneralChat);
        assert_eq!(classify("  WHAT IS A NEURAL NETWORK  "), Classification::SubjectQuestion);
        assert_eq!(classify(""), Classification::GeneralChat);
    }

    #[test]
    fn test_table_ends_with_catch_all() {
        let last = RULES.last().unwrap();
        assert!(matches!(last.condition, Condition::Always));
        assert_eq!(last.name, "default");
    }

    #[test]
    fn test_labels_serialize_upper_snake() {
        assert_eq!(
            serde_json::to_string(&Classification::GuidanceQuestion).unwrap(),
            "\"GUIDANCE_QUESTION\""
        );
        assert_eq!(Classification::GeneralChat.to_string(), "GENERAL_CHAT");
    }

    proptest! {
        #[test]
        fn prop_classification_ignores_case_and_padding(q in "[a-zA-Z ]{0,40}") {
            let padded = format!("  {}\t", q.to_uppercase());
            prop_assert_eq!(classify(&q), classify(&padded));
        }

        #[test]
        fn prop_single_token_is_general_chat(word in "[a-z]{1,20}") {
            prop_assert_eq!(classify(&word), Classification::GeneralChat);
        }
    }
}
